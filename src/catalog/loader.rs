//! Loads the reference workbook into a [`Catalog`]: the vehicle sheet plus
//! one component reference table per category.

use crate::catalog::table::Table;
use crate::catalog::vehicle::VehicleRecord;
use crate::catalog::Catalog;
use crate::catalog::CatalogError;
use crate::config::CatalogConfig;
use crate::error::TechSheetError;
use crate::workbook::sheet::Sheet;
use crate::workbook::xlsx::WorkbookReader;
use log::debug;
use std::path::Path;

/// Parses a reference workbook. A missing file or a missing configured
/// sheet is fatal for the load; everything downstream degrades per-slice
/// instead.
pub(crate) fn load_catalog(path: &Path, config: &CatalogConfig) -> Result<Catalog, TechSheetError> {
    let mut reader = WorkbookReader::open(path)?;

    let vehicle_sheet = read_required(&mut reader, &config.vehicle_sheet)?;
    let vehicle_table = Table::from_sheet(vehicle_sheet, config);
    let vehicles = (0..vehicle_table.row_count())
        .map(|row| VehicleRecord::from_row(&vehicle_table, row, &config.vehicle_columns))
        .collect::<Vec<_>>();

    let mut components = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        let sheet = read_required(&mut reader, &category.sheet)?;
        components.push(Table::from_sheet(sheet, config));
    }

    debug!(
        "loaded catalog '{}': {} vehicles, {} component tables",
        reader.name,
        vehicles.len(),
        components.len()
    );
    Ok(Catalog {
        vehicles,
        components,
    })
}

fn read_required(reader: &mut WorkbookReader, sheet_name: &str) -> Result<Sheet, TechSheetError> {
    reader.read_sheet(sheet_name)?.ok_or_else(|| {
        CatalogError::SheetNotFound(sheet_name.to_owned(), reader.name.to_owned()).into()
    })
}
