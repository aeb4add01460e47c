//! # Dataset Errors

use thiserror::Error;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while building or loading the response dataset
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("Failed to read responses file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed responses file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Response row {0} is not a JSON object")]
    RowNotObject(usize),

    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
}
