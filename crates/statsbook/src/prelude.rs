//! Prelude module - common imports for statsbook users
//!
//! ```rust
//! use statsbook::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Address,
    AddressRange,
    BooleanFormat,
    Comment,
    CommentedValue,
    // Main types
    Document,
    DocumentOptions,
    // Field tables
    DocumentFields,
    Field,
    FieldKind,
    Offset,
    Value,
    // Error types
    XlsxError,
    XlsxResult,
};
