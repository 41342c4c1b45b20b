use thiserror::Error;

/// Main error type for the technical data sheet generator.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum TechSheetError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("template workbook error: {0:?}")]
    TemplateFileError(umya_spreadsheet::XlsxError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Workbook module errors
    #[error("{0}")]
    WorkbookError(#[from] crate::workbook::WorkbookError),

    // Catalog module errors
    #[error("{0}")]
    CatalogError(#[from] crate::catalog::CatalogError),

    // Template module errors
    #[error("{0}")]
    TemplateError(#[from] crate::template::TemplateError),
}

impl From<umya_spreadsheet::XlsxError> for TechSheetError {
    fn from(error: umya_spreadsheet::XlsxError) -> Self {
        TechSheetError::TemplateFileError(error)
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, TechSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| TechSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
