//! Region capacity expansion, the structural heart of the generator. Row
//! insertion is destructive with respect to merge metadata and every
//! row-index bookkeeping the caller holds, so growth follows a fixed
//! sequence: snapshot all merges, drop them, insert the rows, rebuild each
//! merge shifted around the insertion point, then dress the new rows in the
//! styles and height of an existing section row. Callers must treat every
//! previously computed row index as stale once this returns.

use crate::config::LayoutConfig;
use crate::error::TechSheetError;
use crate::helpers::reference::format_range;
use crate::helpers::reference::parse_range;
use crate::template::locator::region_rows;
use crate::template::TemplateError;
use log::warn;
use umya_spreadsheet::Spreadsheet;
use umya_spreadsheet::Worksheet;

/// A merged cell range in plain 1-based coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct MergedRange {
    pub(crate) row_start: u32,
    pub(crate) row_end: u32,
    pub(crate) col_start: u32,
    pub(crate) col_end: u32,
}

impl MergedRange {
    pub(crate) fn new(row_start: u32, row_end: u32, col_start: u32, col_end: u32) -> MergedRange {
        MergedRange {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Parses an `A1:B2`-style merge range.
    pub(crate) fn parse(range: &str) -> Option<MergedRange> {
        let ((col_start, row_start), (col_end, row_end)) = parse_range(range)?;
        Some(MergedRange {
            row_start: row_start.min(row_end),
            row_end: row_start.max(row_end),
            col_start: col_start.min(col_end),
            col_end: col_start.max(col_end),
        })
    }

    /// Renders back to the `A1:B2` form the merge table stores.
    pub(crate) fn to_range(self) -> String {
        format_range((self.col_start, self.row_start), (self.col_end, self.row_end))
    }

    pub(crate) fn contains(self, col: u32, row: u32) -> bool {
        self.row_start <= row && row <= self.row_end && self.col_start <= col && col <= self.col_end
    }

    pub(crate) fn overlaps(self, other: &MergedRange) -> bool {
        self.row_start <= other.row_end
            && other.row_start <= self.row_end
            && self.col_start <= other.col_end
            && other.col_start <= self.col_end
    }

    /// The range as it must look after `extra` rows are inserted at
    /// `insert_at`: fully below shifts down, straddling stretches, fully
    /// above is untouched.
    fn shifted(self, insert_at: u32, extra: u32) -> MergedRange {
        if self.row_start >= insert_at {
            MergedRange {
                row_start: self.row_start + extra,
                row_end: self.row_end + extra,
                ..self
            }
        } else if self.row_end >= insert_at {
            MergedRange {
                row_end: self.row_end + extra,
                ..self
            }
        } else {
            self
        }
    }
}

/// Current merge table of a sheet in parsed form.
pub(crate) fn snapshot_merges(sheet: &Worksheet) -> Vec<MergedRange> {
    sheet
        .get_merge_cells()
        .iter()
        .filter_map(|range| MergedRange::parse(&range.get_range()))
        .collect()
}

/// Grows a section to hold `rows_needed` rows, inserting blank rows
/// immediately before the next section's title so the new space belongs to
/// the growing section. Returns how many rows were inserted (0 when the
/// template's own capacity suffices). Growth is capped at
/// `layout.max_extra_rows` per call.
pub(crate) fn ensure_capacity(
    book: &mut Spreadsheet,
    sheet_index: usize,
    title_row: u32,
    next_row: Option<u32>,
    rows_needed: usize,
    layout: &LayoutConfig,
) -> Result<u32, TechSheetError> {
    let sheet = book
        .get_sheet(&sheet_index)
        .ok_or(TemplateError::NoWorksheet)?;
    let last_row = sheet.get_highest_row();
    let capacity = region_rows(title_row, next_row, last_row).len();
    if rows_needed <= capacity {
        return Ok(0);
    }

    let mut extra = (rows_needed - capacity) as u32;
    if extra > layout.max_extra_rows {
        warn!(
            "section at row {} needs {} extra rows, capping at {}",
            title_row, extra, layout.max_extra_rows
        );
        extra = layout.max_extra_rows;
    }
    let insert_at = next_row.unwrap_or(last_row + 1);
    let sheet_name = sheet.get_name().to_owned();

    // The merge table does not survive row insertion; snapshot and drop it
    // before touching the grid, rebuild it shifted afterwards.
    let merges;
    {
        let sheet = book
            .get_sheet_mut(&sheet_index)
            .ok_or(TemplateError::NoWorksheet)?;
        merges = snapshot_merges(sheet);
        sheet.get_merge_cells_mut().clear();
    }

    book.insert_new_row(&sheet_name, &insert_at, &extra);

    let sheet = book
        .get_sheet_mut(&sheet_index)
        .ok_or(TemplateError::NoWorksheet)?;
    rebuild_merges(sheet, merges, insert_at, extra);
    dress_inserted_rows(sheet, insert_at, extra, layout.scan_max_col);
    Ok(extra)
}

/// Recreates snapshotted merges around the insertion point. A rebuild that
/// would overlap an already recreated merge is skipped; one lost cosmetic
/// merge must not block document delivery.
fn rebuild_merges(sheet: &mut Worksheet, merges: Vec<MergedRange>, insert_at: u32, extra: u32) {
    let mut rebuilt: Vec<MergedRange> = Vec::with_capacity(merges.len());
    for merge in merges {
        let shifted = merge.shifted(insert_at, extra);
        if rebuilt.iter().any(|other| shifted.overlaps(other)) {
            warn!("skipping conflicting merge {}", shifted.to_range());
            continue;
        }
        sheet.add_merge_cells(shifted.to_range());
        rebuilt.push(shifted);
    }
}

/// Copies cell styles and the row height of the row just above the
/// insertion point into each inserted row, leaving values blank, so grown
/// sections look like the template authored them.
fn dress_inserted_rows(sheet: &mut Worksheet, insert_at: u32, extra: u32, min_width: u32) {
    let template_row = insert_at.saturating_sub(1).max(1);
    let width = sheet.get_highest_column().max(min_width);
    let height = sheet
        .get_row_dimension(&template_row)
        .map(|row| *row.get_height());
    for offset in 0..extra {
        let target_row = insert_at + offset;
        for col in 1..=width {
            let style = sheet
                .get_cell((col, template_row))
                .map(|cell| cell.get_style().clone());
            if let Some(style) = style {
                sheet.get_cell_mut((col, target_row)).set_style(style);
            }
        }
        if let Some(height) = height {
            sheet.get_row_dimension_mut(&target_row).set_height(height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umya_spreadsheet::new_file;

    /// Template skeleton: a titled section of `capacity` rows followed by a
    /// "NEXT" title, with a merge inside the section, one above it, one
    /// below it, and one straddling the section boundary columns.
    fn skeleton(capacity: u32) -> (Spreadsheet, u32, u32) {
        let mut book = new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        let title_row = 10u32;
        let next_row = title_row + capacity + 1;
        sheet.get_cell_mut((1u32, 2u32)).set_value("HEADER");
        sheet.get_cell_mut((1u32, title_row)).set_value("BODY");
        sheet.get_cell_mut((1u32, next_row)).set_value("NEXT");
        sheet.get_cell_mut((1u32, next_row + 5)).set_value("END");
        sheet.add_merge_cells("B2:D2"); // above
        sheet.add_merge_cells(format!("B{}:D{}", title_row + 1, title_row + 1)); // inside
        sheet.add_merge_cells(format!("B{}:D{}", next_row + 1, next_row + 1)); // below
        (book, title_row, next_row)
    }

    fn merge_ranges(book: &Spreadsheet) -> Vec<String> {
        let mut ranges: Vec<String> = book
            .get_sheet(&0)
            .unwrap()
            .get_merge_cells()
            .iter()
            .map(|range| range.get_range())
            .collect();
        ranges.sort();
        ranges
    }

    #[test]
    fn sufficient_capacity_is_a_no_op() {
        let (mut book, title_row, next_row) = skeleton(5);
        let before = merge_ranges(&book);
        let layout = LayoutConfig::default();
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 5, &layout).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(merge_ranges(&book), before);
    }

    #[test]
    fn growth_inserts_exactly_the_shortfall() {
        let (mut book, title_row, next_row) = skeleton(5);
        let layout = LayoutConfig::default();
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 12, &layout).unwrap();
        assert_eq!(inserted, 7);

        let sheet = book.get_sheet(&0).unwrap();
        let shifted_next = next_row + inserted;
        assert_eq!(sheet.get_value((1u32, shifted_next)), "NEXT");
        assert_eq!(
            region_rows(title_row, Some(shifted_next), sheet.get_highest_row()).len(),
            12
        );
    }

    #[test]
    fn merges_shift_with_the_insertion_point() {
        let (mut book, title_row, next_row) = skeleton(5);
        let layout = LayoutConfig::default();
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 8, &layout).unwrap();
        assert_eq!(inserted, 3);

        let ranges = merge_ranges(&book);
        // above untouched, inside untouched, below shifted by `inserted`
        assert!(ranges.contains(&"B2:D2".to_owned()));
        assert!(ranges.contains(&format!("B{}:D{}", title_row + 1, title_row + 1)));
        assert!(ranges.contains(&format!(
            "B{}:D{}",
            next_row + 1 + inserted,
            next_row + 1 + inserted
        )));
    }

    #[test]
    fn straddling_merges_stretch_instead_of_shifting() {
        let (mut book, title_row, next_row) = skeleton(5);
        // vertical merge spanning the insertion point
        book.get_sheet_mut(&0)
            .unwrap()
            .add_merge_cells(format!("F{}:F{}", next_row - 2, next_row + 2));
        let layout = LayoutConfig::default();
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 7, &layout).unwrap();
        assert_eq!(inserted, 2);
        assert!(merge_ranges(&book).contains(&format!(
            "F{}:F{}",
            next_row - 2,
            next_row + 2 + inserted
        )));
    }

    #[test]
    fn inserted_rows_inherit_style_and_height() {
        let (mut book, title_row, next_row) = skeleton(5);
        {
            let sheet = book.get_sheet_mut(&0).unwrap();
            sheet
                .get_style_mut(format!("B{}", next_row - 1).as_str())
                .set_background_color("FFEEDD00");
            sheet.get_row_dimension_mut(&(next_row - 1)).set_height(21.5);
        }
        let layout = LayoutConfig::default();
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 9, &layout).unwrap();
        assert_eq!(inserted, 4);

        let sheet = book.get_sheet(&0).unwrap();
        let template_style = sheet
            .get_cell((2u32, next_row - 1))
            .map(|cell| format!("{:?}", cell.get_style()))
            .unwrap();
        for offset in 0..inserted {
            let row = next_row + offset;
            let style = sheet
                .get_cell((2u32, row))
                .map(|cell| format!("{:?}", cell.get_style()))
                .unwrap();
            assert_eq!(style, template_style);
            assert_eq!(*sheet.get_row_dimension(&row).unwrap().get_height(), 21.5);
        }
    }

    #[test]
    fn growth_is_capped() {
        let (mut book, title_row, next_row) = skeleton(5);
        let mut layout = LayoutConfig::default();
        layout.max_extra_rows = 10;
        let inserted =
            ensure_capacity(&mut book, 0, title_row, Some(next_row), 5000, &layout).unwrap();
        assert_eq!(inserted, 10);
    }
}
