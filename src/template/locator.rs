//! Template section location. Sections have no identity other than their
//! title text: each one is found by scanning the sheet for a cell whose
//! normalized text contains the section's keywords, and its row range is
//! whatever lies between that title and the next one. Row insertion shifts
//! everything below the insertion point, so location is redone from scratch
//! after every structural change rather than patched incrementally.

use crate::config::LayoutConfig;
use crate::config::SectionId;
use crate::helpers::text::normalize_cell_text;
use crate::template::TemplateError;
use umya_spreadsheet::Worksheet;

/// One section as found in the sheet right now. Stale as soon as any row
/// is inserted.
#[derive(Clone, Debug)]
pub(crate) struct LocatedSection {
    pub(crate) id: SectionId,
    /// Row carrying the section title
    pub(crate) title_row: u32,
    /// Title row of the next section (exclusive bound); `None` for the
    /// last section before the footer
    pub(crate) next_row: Option<u32>,
}

/// Finds the first row whose normalized cell text contains all of
/// `required` and none of `excluded`, scanning top-to-bottom and
/// left-to-right within the bounded column range.
pub(crate) fn find_title_row(
    sheet: &Worksheet,
    required: &[String],
    excluded: &[String],
    scan_max_col: u32,
) -> Option<u32> {
    let required: Vec<String> = required.iter().map(|k| normalize_cell_text(k)).collect();
    let excluded: Vec<String> = excluded.iter().map(|k| normalize_cell_text(k)).collect();
    let last_row = sheet.get_highest_row();
    for row in 1..=last_row {
        for col in 1..=scan_max_col {
            let text = sheet.get_value((col, row));
            if text.trim().is_empty() {
                continue;
            }
            let normalized = normalize_cell_text(&text);
            let accepted = required.iter().all(|keyword| normalized.contains(keyword))
                && excluded.iter().all(|keyword| !normalized.contains(keyword));
            if accepted {
                return Some(row);
            }
        }
    }
    None
}

/// Rows making up a section's writable region: everything strictly between
/// the title row and the next title. Open-ended sections run to the last
/// sheet row.
pub(crate) fn region_rows(title_row: u32, next_row: Option<u32>, last_row: u32) -> Vec<u32> {
    let upper = match next_row {
        Some(next) => next.saturating_sub(1),
        None => last_row,
    };
    if upper <= title_row {
        return Vec::new();
    }
    (title_row + 1..=upper).collect()
}

/// Locates every configured section plus the terminal footer marker and
/// derives pairwise bounds. A missing section title means the template is
/// not the expected document; that is fatal.
pub(crate) fn locate_sections(
    sheet: &Worksheet,
    layout: &LayoutConfig,
) -> Result<Vec<LocatedSection>, TemplateError> {
    let mut found = Vec::with_capacity(layout.sections.len());
    for spec in &layout.sections {
        let title_row = find_title_row(sheet, &spec.keywords, &spec.excluded, layout.scan_max_col)
            .ok_or(TemplateError::SectionNotFound(spec.id))?;
        found.push((spec.id, title_row));
    }
    found.sort_by_key(|(_, title_row)| *title_row);

    let footer_row = find_title_row(sheet, &layout.footer_keywords, &[], layout.scan_max_col);
    let mut sections = Vec::with_capacity(found.len());
    for (index, (id, title_row)) in found.iter().enumerate() {
        let next_row = found
            .get(index + 1)
            .map(|(_, row)| *row)
            .or(footer_row);
        sections.push(LocatedSection {
            id: *id,
            title_row: *title_row,
            next_row,
        });
    }
    Ok(sections)
}
