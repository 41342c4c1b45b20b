//! # Vehicle Technical Data Sheet Generator
//!
//! Generates a formatted technical data sheet for a vehicle by looking up
//! its component codes in a reference workbook and writing the matching
//! attributes into a fixed-layout xlsx template, growing template sections
//! on demand when an attribute list outgrows the pre-allocated space.
//!
//! ## Features
//!
//! - **Reference catalog loading**: vehicle table plus six component
//!   reference tables read from one xlsx source, with column headers
//!   normalized against authoring inconsistencies (case, accents,
//!   embedded line breaks, duplicate names)
//! - **Code resolution**: user override or vehicle default, exact match
//!   with a platform-prefix fallback, product/option marker preference
//! - **Template region growth**: sections found by title keyword search
//!   and resized in place, preserving cell merges, styles, row heights and
//!   neighboring content
//! - **Merge-aware writing**: single-column and round-robin multi-column
//!   text blocks, merge-aware scalar header cells
//! - **Graceful degradation**: a missing code writes an empty section, a
//!   missing image is omitted; only an unusable source or template file
//!   aborts a generation
//!
//! ## Typical flow
//!
//! The host UI owns a [`CatalogCache`], lets the user pick a
//! [`VehicleRecord`] via [`filter_records`], collects dropdown
//! [`Overrides`], and calls [`generate`] to obtain the downloadable
//! workbook bytes, named per [`output_file_name`].

pub mod catalog;
pub mod config;
mod error;
mod helpers;
pub mod template;
pub mod workbook;

pub use catalog::build_values;
pub use catalog::distinct_values;
pub use catalog::filter_records;
pub use catalog::find_reference_row;
pub use catalog::resolve_code;
pub use catalog::Catalog;
pub use catalog::CatalogCache;
pub use catalog::FilterField;
pub use catalog::Marker;
pub use catalog::VehicleRecord;
pub use config::Category;
pub use config::TechSheetConfig;
pub use error::TechSheetError;
pub use template::generate;
pub use template::output_file_name;
pub use template::Overrides;
pub use template::Template;
pub use workbook::CellValue;
