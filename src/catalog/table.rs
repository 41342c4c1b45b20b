//! Reference table model. A table is one sheet of the reference workbook
//! with its header row normalized into lookup-friendly column names and its
//! data rows held in source order.

use crate::config::CatalogConfig;
use crate::helpers::text::first_useful_line;
use crate::helpers::text::normalize_column_name;
use crate::workbook::cell::CellValue;
use crate::workbook::sheet::Sheet;
use log::warn;
use std::collections::HashMap;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One column of a reference table.
#[derive(Clone, Debug)]
pub struct Column {
    /// Header text as authored, line breaks included
    pub raw: String,
    /// Normalized identifier used for lookups
    pub name: String,
}

/// One reference table (component catalog sheet or vehicle sheet).
#[derive(Clone, Debug)]
pub struct Table {
    /// Source sheet name
    pub name: String,
    /// Columns in source order
    pub columns: Vec<Column>,
    /// Data rows in source order, each aligned to `columns`
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Builds a table from a raw sheet grid. The first row is the header;
    /// header names go through the normalization pipeline: first useful
    /// line, accent/case folding, underscore collapsing, concatenation
    /// column removal, duplicate-name disambiguation.
    pub(crate) fn from_sheet(sheet: Sheet, config: &CatalogConfig) -> Table {
        let name = sheet.name.to_owned();
        if sheet.is_empty() {
            return Table {
                name,
                columns: Vec::new(),
                rows: Vec::new(),
            };
        }

        let mut grid = sheet.into_rows();
        let header = grid.remove(0);
        let mut kept = Vec::with_capacity(header.len());
        let mut columns = Vec::new();
        let mut seen = HashMap::<String, usize>::new();
        for cell in header {
            let raw = cell.display();
            if is_concatenation_header(&raw, config) {
                kept.push(false);
                continue;
            }
            kept.push(true);
            let mut base = normalize_column_name(first_useful_line(&raw));
            if base.is_empty() && raw.trim() != "_" {
                base = "column".to_owned();
            }
            let count = seen.entry(base.to_owned()).or_insert(0);
            *count += 1;
            let name = if *count > 1 {
                format!("{}_{}", base, count)
            } else {
                base
            };
            columns.push(Column { raw, name });
        }

        let rows = grid
            .into_iter()
            .map(|row| {
                let mut record: Vec<CellValue> = row
                    .into_iter()
                    .zip(kept.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value)
                    .collect();
                record.resize_with(columns.len(), CellValue::default);
                record
            })
            .filter(|record| record.iter().any(|value| !value.is_empty()))
            .collect();

        Table {
            name,
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column with the given normalized name.
    pub fn column_index(&self, normalized: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name == normalized)
    }

    /// Cell value at (row, column); out-of-range access reads as empty.
    pub fn value(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|record| record.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Resolves the configured code column, falling back to the first
    /// column when the configured name is absent. The fallback keeps
    /// lookups working against loosely-authored sheets; it is logged, not
    /// raised.
    pub(crate) fn code_column(&self, configured: &str) -> usize {
        match self.column_index(configured) {
            Some(index) => index,
            None => {
                warn!(
                    "code column '{}' not found in sheet '{}', using first column",
                    configured, self.name
                );
                0
            }
        }
    }

    /// Index of the product/option marker column, when the table has one.
    pub(crate) fn marker_column(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| is_marker_name(&column.name))
    }
}

/// A column whose normalized name carries both tokens is the marker
/// distinguishing base product rows from option rows.
pub(crate) fn is_marker_name(name: &str) -> bool {
    name.contains("product") && name.contains("option")
}

/// Some source files carry a redundant column concatenating every other
/// column; its header is recognizably oversized on both axes.
fn is_concatenation_header(raw: &str, config: &CatalogConfig) -> bool {
    raw.lines().count() > config.concatenation_line_threshold
        && raw.chars().count() > config.concatenation_char_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::cell::Cell;

    fn sheet(rows: &[&[&str]]) -> Sheet {
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
        sheet
    }

    #[test]
    fn header_names_are_normalized_and_deduplicated() {
        let table = Table::from_sheet(
            sheet(&[
                &["CAB_cabine", "Équipement", "Equipement", "Poids\n(kg)"],
                &["CAB001", "heated seats", "abs", "1200"],
            ]),
            &CatalogConfig::default(),
        );
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["cab_cabine", "equipement", "equipement_2", "poids"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn concatenation_column_is_dropped() {
        let oversized = format!(
            "ALL\nFIELDS\nJOINED\nTOGETHER\n{}",
            "x".repeat(150)
        );
        let table = Table::from_sheet(
            sheet(&[
                &["code", oversized.as_str(), "label"],
                &["A1", "everything at once", "cab"],
            ]),
            &CatalogConfig::default(),
        );
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["code", "label"]);
        assert_eq!(table.value(0, 1), &CellValue::Text("cab".to_owned()));
    }

    #[test]
    fn empty_rows_are_skipped() {
        let table = Table::from_sheet(
            sheet(&[&["code", "label"], &["", ""], &["A1", "cab"]]),
            &CatalogConfig::default(),
        );
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn code_column_falls_back_to_first() {
        let table = Table::from_sheet(
            sheet(&[&["anything", "label"], &["A1", "cab"]]),
            &CatalogConfig::default(),
        );
        assert_eq!(table.code_column("ch_chassis"), 0);
        assert_eq!(table.code_column("label"), 1);
    }

    #[test]
    fn marker_column_is_recognized() {
        let table = Table::from_sheet(
            sheet(&[&["code", "Product or Option", "label"], &["A1", "product", "cab"]]),
            &CatalogConfig::default(),
        );
        assert_eq!(table.marker_column(), Some(1));
    }
}
