//! # Template Engine
//!
//! The output side of the crate: locating the template's titled sections,
//! growing them to fit variable-length attribute lists while preserving
//! merges, styles and row heights, writing values into their merged column
//! spans, and assembling the finished document.

pub(crate) mod assembler;
pub(crate) mod expander;
pub(crate) mod images;
pub(crate) mod locator;
pub(crate) mod writer;

pub use assembler::generate;
pub use assembler::output_file_name;
pub use assembler::Overrides;
pub use assembler::Template;

use crate::config::SectionId;
use thiserror::Error;

/// Errors raised by the template engine. Everything here means the template
/// workbook is not the expected document; data problems never surface as
/// errors on this side.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template workbook has no worksheet at all
    #[error("Template workbook has no worksheet")]
    NoWorksheet,

    /// A configured section title was not found anywhere in the sheet
    #[error("Section {0:?} title not found in template")]
    SectionNotFound(SectionId),
}
