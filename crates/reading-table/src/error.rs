//! Validation Error Types

use thiserror::Error;

/// Malformed input detected while coercing a raw table into readings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required sensor column absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Same column name appears twice in the header
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Row width does not match the header
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Cell cannot be coerced to a finite number
    #[error("{column} value {value:?} in row {row} is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Integer column holds a fractional value
    #[error("{column} value {value} in row {row} is not an integer")]
    NotInteger {
        column: &'static str,
        row: usize,
        value: f64,
    },
}
