//! ZIP container
//!
//! Just enough of the ZIP format to read an xlsx package and write it back
//! with a handful of parts replaced: store and deflate entries, optional
//! data descriptors, no ZIP64, no encryption.

mod container;
mod cursor;
mod entry;
mod error;

pub use container::ZipContainer;
pub use entry::{CompressionMethod, ZipEntry};
pub use error::{ZipError, ZipResult};
