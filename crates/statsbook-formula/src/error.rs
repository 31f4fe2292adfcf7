//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    // === Parse errors ===
    /// A `(` was never closed
    #[error("Parse error: missing closing parenthesis")]
    MissingClosingParen,

    /// Two function arguments were not separated by a comma
    #[error("Parse error: expected ',' between arguments of {0}")]
    ExpectedComma(String),

    /// A cell reference could not be read
    #[error("Parse error: malformed cell address near '{0}'")]
    MalformedAddress(String),

    /// The two ends of a range do not form a valid range
    #[error("Parse error: malformed range near '{0}'")]
    MalformedRange(String),

    /// A string literal has no closing quote
    #[error("Parse error: unterminated string")]
    UnterminatedString,

    /// Nothing recognizable where a value was expected
    #[error("Parse error: unrecognized input at '{0}'")]
    UnrecognizedTerminal(String),

    /// A complete expression was followed by more text
    #[error("Parse error: unexpected characters after expression: '{0}'")]
    TrailingInput(String),

    // === Evaluation errors ===
    /// Operand kinds do not suit the operator or function
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The function is not part of the supported library
    #[error("Unimplemented function: {0}")]
    UnimplementedFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// A range was used where a single value is required
    #[error("Range {0} can only be used as a function argument")]
    RangeNotAllowed(String),

    /// A formula depends on its own value
    #[error("Circular reference detected at {0}")]
    CycleDetected(String),

    /// A relocated reference fell off the grid
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A reference names a sheet the workbook does not have
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    /// The cell resolver failed for a reason outside the formula itself
    #[error("Cannot read referenced cell: {0}")]
    ReferenceFailed(String),
}
