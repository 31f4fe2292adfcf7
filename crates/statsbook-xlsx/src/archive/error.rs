//! Archive container errors

use thiserror::Error;

/// Result type for archive operations
pub type ZipResult<T> = std::result::Result<T, ZipError>;

/// Errors raised while indexing, reading or rewriting a ZIP archive
#[derive(Debug, Error)]
pub enum ZipError {
    /// IO error from the deflate streams
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a ZIP archive we can index
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// A record runs past the end of the buffer
    #[error("Archive truncated: need {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// The entry uses a method other than store or deflate
    #[error("Unsupported compression method {method} for entry {name}")]
    UnsupportedCompression { name: String, method: u16 },

    /// No entry with this name
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Decompressed bytes do not match the recorded CRC-32
    #[error("Checksum mismatch in {name}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// Decompressed length does not match the recorded size
    #[error("Size mismatch in {name}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// The archive needs ZIP64 extensions
    #[error("ZIP64 archives are not supported")]
    Zip64Unsupported,

    /// A payload or offset does not fit the 32-bit fields
    #[error("Entry too large for a 32-bit archive: {0}")]
    EntryTooLarge(String),
}
