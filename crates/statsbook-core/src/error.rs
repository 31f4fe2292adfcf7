//! Error types for statsbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in statsbook-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// An offset moved an address off the grid
    #[error("Address {address} cannot be offset by ({rows}, {cols})")]
    OffsetOutOfBounds {
        address: String,
        rows: i64,
        cols: i64,
    },
}
