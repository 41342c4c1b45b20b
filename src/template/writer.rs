//! Section and scalar writing. Every text block in the template is a row of
//! merged cells; writers first force each target row into the section's
//! column span (inferred from the merge the template authors left in a
//! sample row), then fill values top to bottom. Capacity is guaranteed by
//! the expander beforehand, so values beyond the region are dropped
//! silently.

use crate::helpers::reference::parse_reference;
use crate::template::expander::snapshot_merges;
use crate::template::expander::MergedRange;
use crate::workbook::cell::CellValue;
use umya_spreadsheet::Worksheet;

/// Column span (start, end) of the merge containing a cell, if any.
pub(crate) fn merged_span(sheet: &Worksheet, col: u32, row: u32) -> Option<(u32, u32)> {
    snapshot_merges(sheet)
        .into_iter()
        .find(|merge| merge.contains(col, row))
        .map(|merge| (merge.col_start, merge.col_end))
}

/// Forces a single-row merge over `col_start..=col_end`. Any merge
/// overlapping that span on that row is removed first; an exact match is
/// kept as is. Degenerate one-cell spans only clear conflicting merges.
pub(crate) fn force_row_merge(sheet: &mut Worksheet, row: u32, col_start: u32, col_end: u32) {
    let target = MergedRange::new(row, row, col_start, col_end);
    let mut exists = false;
    sheet
        .get_merge_cells_mut()
        .retain(|range| match MergedRange::parse(&range.get_range()) {
            Some(existing) if existing == target => {
                exists = true;
                true
            }
            Some(existing) if existing.overlaps(&target) => false,
            _ => true,
        });
    if !exists && col_end > col_start {
        sheet.add_merge_cells(target.to_range());
    }
}

/// Writes one value per row into a single text block. The block's column
/// span is inferred from the template's merge in the first region row; rows
/// without a value are still merged so the region stays visually uniform.
pub(crate) fn write_single_column(
    sheet: &mut Worksheet,
    rows: &[u32],
    column: u32,
    values: &[String],
) {
    let Some(sample_row) = rows.first().copied() else {
        return;
    };
    let span_end = merged_span(sheet, column, sample_row)
        .map(|(_, end)| end)
        .unwrap_or(column);
    for (index, row) in rows.iter().enumerate() {
        force_row_merge(sheet, *row, column, span_end);
        if let Some(value) = values.get(index) {
            sheet.get_cell_mut((column, *row)).set_value(value.as_str());
        }
    }
}

/// Writes one value list across several side-by-side text blocks,
/// column-major per row: row 1 gets the first `columns.len()` values left
/// to right, row 2 the next, until the values run out.
pub(crate) fn write_distributed(
    sheet: &mut Worksheet,
    rows: &[u32],
    columns: &[u32],
    values: &[String],
) {
    let Some(sample_row) = rows.first().copied() else {
        return;
    };
    if columns.is_empty() {
        return;
    }
    let spans: Vec<(u32, u32)> = columns
        .iter()
        .map(|column| {
            let end = merged_span(sheet, *column, sample_row)
                .map(|(_, end)| end)
                .unwrap_or(*column);
            (*column, end)
        })
        .collect();
    let mut next = 0usize;
    for row in rows {
        for (col_start, col_end) in &spans {
            force_row_merge(sheet, *row, *col_start, *col_end);
            if let Some(value) = values.get(next) {
                sheet.get_cell_mut((*col_start, *row)).set_value(value.as_str());
            }
            next += 1;
        }
    }
}

/// Writes a scalar into a fixed template cell, redirected to the top-left
/// of the containing merge when the cell is pre-merged (writing anywhere
/// else in a merged range does not show).
pub(crate) fn write_scalar(sheet: &mut Worksheet, cell: &str, value: &CellValue) {
    let Some((col, row)) = parse_reference(cell) else {
        return;
    };
    let (col, row) = snapshot_merges(sheet)
        .into_iter()
        .find(|merge| merge.contains(col, row))
        .map(|merge| (merge.col_start, merge.row_start))
        .unwrap_or((col, row));
    let target = sheet.get_cell_mut((col, row));
    match value {
        CellValue::Empty => {
            target.set_value("");
        }
        CellValue::Text(text) => {
            target.set_value(text.as_str());
        }
        CellValue::Number(number) => {
            target.set_value_number(*number);
        }
        CellValue::Bool(flag) => {
            target.set_value_bool(*flag);
        }
    }
}
