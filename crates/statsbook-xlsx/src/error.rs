//! XLSX error types

use thiserror::Error;

use crate::archive::ZipError;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while opening, evaluating or saving a document
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute in an XML part
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Elements are not properly nested
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A part is present but does not have the expected shape
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// The workbook has no sheet with this name, or its relationship
    /// does not resolve
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The sheet grid has no cell at this address
    #[error("Cell not found: {sheet}!{address}")]
    CellNotFound { sheet: String, address: String },

    /// The document is not the expected release of the workbook
    #[error("Unsupported version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: String, found: String },

    /// Formula parse or evaluation error
    #[error("Formula error: {0}")]
    Formula(#[from] statsbook_formula::FormulaError),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] statsbook_core::Error),
}
