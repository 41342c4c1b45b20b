//! # Reference Catalog
//!
//! The data side of the crate: the vehicle table and the six component
//! reference tables, loaded once per source workbook, plus the lookups that
//! turn a vehicle's component codes into attribute lists.

pub(crate) mod attributes;
pub(crate) mod cache;
pub(crate) mod loader;
pub(crate) mod resolver;
pub(crate) mod table;
pub(crate) mod vehicle;

pub use attributes::build_values;
pub use cache::CatalogCache;
pub use resolver::find_reference_row;
pub use resolver::resolve_code;
pub use resolver::Marker;
pub use table::Column;
pub use table::Table;
pub use vehicle::distinct_values;
pub use vehicle::filter_records;
pub use vehicle::CategoryCodes;
pub use vehicle::Dimensions;
pub use vehicle::FilterField;
pub use vehicle::ImageRefs;
pub use vehicle::VehicleRecord;

use crate::config::CatalogConfig;
use crate::config::Category;
use crate::error::TechSheetError;
use std::path::Path;
use thiserror::Error;

/// Errors raised while assembling the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A configured sheet is absent from the reference workbook
    #[error("Sheet '{0}' not found in reference workbook '{1}'")]
    SheetNotFound(String, String),
}

/// The loaded reference data: vehicles plus one table per component
/// category. Read-only once built; generations borrow it.
#[derive(Clone, Debug)]
pub struct Catalog {
    /// One record per vehicle-sheet row
    pub vehicles: Vec<VehicleRecord>,
    /// Component tables in [`Category::ALL`] order
    components: Vec<Table>,
}

impl Catalog {
    /// Parses a reference workbook from disk.
    pub fn load(path: &Path, config: &CatalogConfig) -> Result<Catalog, TechSheetError> {
        loader::load_catalog(path, config)
    }

    /// The reference table of one component category.
    pub fn component(&self, category: Category) -> &Table {
        &self.components[category.index()]
    }
}
