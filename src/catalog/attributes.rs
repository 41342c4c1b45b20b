//! Attribute extraction: turns a matched reference-table row into the
//! ordered list of display strings written into a template section.

use crate::catalog::table::is_marker_name;
use crate::catalog::table::Table;
use crate::config::CatalogConfig;

/// Builds the attribute list for one table row.
///
/// Columns are visited in source order. The code column, marker columns,
/// reserved free-zone columns and columns literally named `_` are skipped;
/// so are empty values. Multi-line cell values contribute one entry per
/// non-empty trimmed line, in place. An absent row yields an empty list.
pub fn build_values(
    table: &Table,
    row: Option<usize>,
    code_column: usize,
    config: &CatalogConfig,
) -> Vec<String> {
    let Some(row) = row else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for (index, column) in table.columns.iter().enumerate() {
        if index == code_column
            || is_marker_name(&column.name)
            || column.name.starts_with(&config.free_zone_prefix)
            || column.raw.trim() == "_"
        {
            continue;
        }
        let value = table.value(row, index);
        if value.is_empty() {
            continue;
        }
        for line in value.display().lines() {
            let line = line.trim();
            if !line.is_empty() {
                values.push(line.to_owned());
            }
        }
    }
    values
}
