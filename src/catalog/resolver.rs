//! Effective-code resolution and reference-row lookup. Given a user's
//! dropdown choice and a vehicle's stored defaults, this module decides
//! which catalog row describes each component: exact code match first, then
//! a platform-prefix substring fallback, with an optional preference between
//! base-product and option rows when a code appears as both.

use crate::catalog::table::Table;
use crate::helpers::text::normalize_cell_text;
use crate::workbook::cell::CellValue;
use log::debug;

/// Row flavor in a component reference table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Base product row
    Product,
    /// Options row
    Option,
}

impl Marker {
    fn keyword(self) -> &'static str {
        match self {
            Marker::Product => "product",
            Marker::Option => "option",
        }
    }

    /// Whether a marker cell designates this flavor. Authors write the
    /// marker in assorted case/accents; containment over the normalized
    /// text absorbs that.
    pub(crate) fn matches(self, cell: &CellValue) -> bool {
        normalize_cell_text(&cell.display()).contains(self.keyword())
    }
}

/// Picks the effective code: an explicit dropdown choice wins unless it is
/// empty or the "all/any" sentinel, in which case the vehicle's stored
/// default applies.
pub fn resolve_code<'a>(
    explicit: Option<&'a str>,
    vehicle_default: &'a str,
    any_sentinel: &str,
) -> &'a str {
    match explicit {
        Some(choice)
            if !choice.trim().is_empty() && !choice.trim().eq_ignore_ascii_case(any_sentinel) =>
        {
            choice
        }
        _ => vehicle_default,
    }
}

/// Finds the reference-table row for a code.
///
/// 1. An empty (or whitespace) code skips the exact search.
/// 2. Exact trimmed match on the code column; with `prefer_marker` set and
///    several matches, the row whose marker cell matches wins, otherwise
///    the first match.
/// 3. Without a code or a match, and with a platform code supplied, its
///    leading token (text before the first " - ") is searched as a
///    substring of the code column, same marker preference.
/// 4. No match is not an error; the caller writes an empty section.
pub fn find_reference_row(
    table: &Table,
    code: &str,
    code_column: usize,
    fallback_platform_code: Option<&str>,
    prefer_marker: Option<Marker>,
) -> Option<usize> {
    let code = code.trim();
    if !code.is_empty() {
        let matches = rows_where(table, code_column, |cell| cell.trim() == code);
        if let Some(row) = pick(table, &matches, prefer_marker) {
            return Some(row);
        }
    }

    let token = fallback_platform_code
        .map(platform_token)
        .unwrap_or_default();
    if !token.is_empty() {
        let matches = rows_where(table, code_column, |cell| cell.contains(token));
        if let Some(row) = pick(table, &matches, prefer_marker) {
            // First match wins on shared prefixes; log it so curators can
            // audit collisions.
            debug!(
                "platform fallback '{}' matched code '{}' in sheet '{}'",
                token,
                table.value(row, code_column).display(),
                table.name
            );
            return Some(row);
        }
    }

    None
}

/// Leading token of a platform code: the text before the first " - ".
fn platform_token(platform_code: &str) -> &str {
    platform_code
        .split(" - ")
        .next()
        .unwrap_or(platform_code)
        .trim()
}

fn rows_where<F>(table: &Table, code_column: usize, accept: F) -> Vec<usize>
where
    F: Fn(&str) -> bool,
{
    (0..table.row_count())
        .filter(|row| accept(&table.value(*row, code_column).display()))
        .collect()
}

/// First marker-preferred row among the matches, else the first match.
fn pick(table: &Table, matches: &[usize], prefer_marker: Option<Marker>) -> Option<usize> {
    if let (Some(marker), Some(column)) = (prefer_marker, table.marker_column()) {
        if let Some(row) = matches
            .iter()
            .find(|row| marker.matches(table.value(**row, column)))
        {
            return Some(*row);
        }
    }
    matches.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::workbook::cell::Cell;
    use crate::workbook::sheet::Sheet;

    fn table(rows: &[&[&str]]) -> Table {
        let mut sheet = Sheet::new("CABIN");
        for (row, record) in rows.iter().enumerate() {
            for (col, text) in record.iter().enumerate() {
                sheet.push(Cell {
                    row: row as u32 + 1,
                    col: col as u32 + 1,
                    value: CellValue::from_text(text),
                });
            }
        }
        sheet.finish();
        Table::from_sheet(sheet, &CatalogConfig::default())
    }

    #[test]
    fn explicit_choice_wins_over_default() {
        assert_eq!(resolve_code(Some("CAB002"), "CAB001", "ALL"), "CAB002");
        assert_eq!(resolve_code(Some("  "), "CAB001", "ALL"), "CAB001");
        assert_eq!(resolve_code(Some("all"), "CAB001", "ALL"), "CAB001");
        assert_eq!(resolve_code(None, "CAB001", "ALL"), "CAB001");
    }

    #[test]
    fn exact_match_beats_fallback() {
        let table = table(&[
            &["cab_cabin", "label"],
            &["CAB001", "first"],
            &["CAB002", "second"],
        ]);
        let row = find_reference_row(&table, "CAB002", 0, Some("CAB - Euro"), None);
        assert_eq!(row, Some(1));
    }

    #[test]
    fn marker_preference_selects_option_row() {
        let table = table(&[
            &["cab_cabin", "Product or Option", "label"],
            &["CAB001", "Product", "base trim"],
            &["CAB001", "Option", "extra trim"],
        ]);
        let product = find_reference_row(&table, "CAB001", 0, None, Some(Marker::Product));
        let option = find_reference_row(&table, "CAB001", 0, None, Some(Marker::Option));
        assert_eq!(product, Some(0));
        assert_eq!(option, Some(1));
    }

    #[test]
    fn platform_fallback_uses_leading_token() {
        let table = table(&[
            &["cab_cabin", "Product or Option"],
            &["XX900", "Product"],
            &["PF42-A", "Product"],
            &["PF42-B", "Option"],
        ]);
        let row = find_reference_row(&table, "", 0, Some("PF42 - EuroTruck"), Some(Marker::Option));
        assert_eq!(row, Some(2));

        let first = find_reference_row(&table, "", 0, Some("PF42 - EuroTruck"), None);
        assert_eq!(first, Some(1));
    }

    #[test]
    fn no_match_is_absent() {
        let table = table(&[&["cab_cabin"], &["CAB001"]]);
        assert_eq!(find_reference_row(&table, "MISSING", 0, None, None), None);
        assert_eq!(find_reference_row(&table, "", 0, None, None), None);
    }
}
