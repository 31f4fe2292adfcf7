//! # statsbook
//!
//! Read, evaluate and update stats book spreadsheets in place.
//!
//! A stats book is an xlsx workbook with a fixed layout. This crate opens
//! one from memory, reads and evaluates cells (formulas included), writes
//! new values, and saves the package with every part that was not
//! written to left byte-identical.
//!
//! ## Features
//!
//! - ZIP container with in-place part replacement
//! - Formula parsing and evaluation, including shared formulas
//! - Shared strings, inline strings, comments and number formats
//! - Named field tables for fixed-layout records
//!
//! ## Example
//!
//! ```rust,no_run
//! use statsbook::prelude::*;
//!
//! # fn main() -> XlsxResult<()> {
//! let mut doc = Document::open(std::fs::read("statsbook.xlsx")?)?;
//! let home = doc.value("IGRF", &Address::parse("B8").unwrap())?;
//! doc.set_value("IGRF", &Address::parse("B9").unwrap(), "Home Team")?;
//! std::fs::write("updated.xlsx", doc.save()?)?;
//! # let _ = home;
//! # Ok(())
//! # }
//! ```

pub mod fields;
pub mod prelude;

pub use fields::{DocumentFields, Field, FieldKind};

// Re-export core types
pub use statsbook_core::{
    Address, AddressRange, Comment, CommentedValue, Error, Offset, Result, Value, ValueOrdering,
    MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use statsbook_formula::{
    evaluate_at, parse_formula, CellResolver, FormulaError, FormulaExpr, FormulaResult, NoCells,
};

// Re-export document types
pub use statsbook_xlsx::{
    BooleanFormat, Document, DocumentOptions, Sheet, XlsxError, XlsxResult, ZipContainer,
    ZipError,
};
