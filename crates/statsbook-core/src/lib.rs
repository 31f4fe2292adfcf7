//! # statsbook-core
//!
//! Core data structures for the statsbook spreadsheet engine.
//!
//! This crate provides the types shared by the formula engine and the
//! package reader:
//! - [`Address`], [`Offset`] and [`AddressRange`] - anchored cell coordinates
//! - [`Value`] - cell values with blank-aware equality
//! - [`CommentedValue`] and [`Comment`] - a value together with its annotations
//!
//! ## Example
//!
//! ```rust
//! use statsbook_core::{Address, Offset};
//!
//! let addr = Address::parse("$B2").unwrap();
//! let moved = addr.offset(Offset::new(3, 4)).unwrap();
//! assert_eq!(moved.to_string(), "$B5");
//! ```

pub mod cell;
pub mod comment;
pub mod error;

pub use cell::{Address, AddressRange, AddressRangeIter, Offset, Value, ValueOrdering};
pub use comment::{Comment, CommentedValue};
pub use error::{Error, Result};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
