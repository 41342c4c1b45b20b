//! # Reference Workbook Reading
//!
//! Raw xlsx access for the reference side of the crate: the ZIP container,
//! the SpreadsheetML worksheet parts, the shared string table, and the
//! normalization of loosely-typed cell content into [`CellValue`].
//!
//! The template side deliberately does not go through this module; templates
//! are mutated and re-serialized with `umya-spreadsheet`, which preserves the
//! styling metadata this reader has no need to model.

pub(crate) mod cell;
pub(crate) mod sheet;
pub(crate) mod xlsx;

pub use cell::CellValue;

use thiserror::Error;

/// Errors raised while reading the reference workbook's structure.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// Workbook archive opened but declared no worksheets
    #[error("Workbook '{0}' contains no worksheets")]
    NoWorksheets(String),

    /// A declared part is missing from the archive
    #[error("Missing workbook part '{0}'")]
    MissingPart(String),
}
