//! Error types for tabular analysis
//!
//! Provides a unified error type for all tabular-insight crates. Data-dependent
//! conditions (empty columns, too few samples) are not errors: engines answer
//! them with empty results. Only caller mistakes end up here.

use thiserror::Error;

/// Core error type for tabular-insight operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter provided to an analysis operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A method name that does not name any known method
    #[error("Unknown method '{name}', expected one of: {expected}")]
    UnknownMethod { name: String, expected: String },

    /// Column not present in the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column lengths disagree while building a table
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// The same column name was added twice
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a parameter that must be finite and non-negative
    pub fn non_negative(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} must be finite and >= 0, got {value}"))
    }

    /// Create an error for an unknown method name
    pub fn unknown_method(name: &str, expected: &[&str]) -> Self {
        Self::UnknownMethod {
            name: name.to_string(),
            expected: expected.join(", "),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
