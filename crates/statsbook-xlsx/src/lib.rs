//! # statsbook-xlsx
//!
//! Reads and writes stats book xlsx packages. Cells are read and
//! evaluated in place and written back into the worksheet XML, leaving
//! every part that was not touched byte-identical.

pub mod archive;
pub mod cell;
pub mod document;
pub mod error;
pub mod options;
pub mod relationships;
pub mod shared_strings;
pub mod sheet;
pub mod styles;
pub mod workbook;
pub mod xml;

mod comments;

pub use archive::{ZipContainer, ZipError};
pub use cell::{Cell, FormulaSource};
pub use document::Document;
pub use error::{XlsxError, XlsxResult};
pub use options::{BooleanFormat, DocumentOptions};
pub use shared_strings::SharedStrings;
pub use sheet::{SharedFormula, Sheet};
pub use styles::Styles;
pub use workbook::{SheetEntry, WorkbookIndex};
