//! Shared low-level utilities: text normalization, A1 reference arithmetic,
//! and the ZIP/XML plumbing used to read the reference workbook.

pub(crate) mod reference;
pub(crate) mod text;
pub(crate) mod xml;
pub(crate) mod zip;
