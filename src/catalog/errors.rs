//! # Catalog Errors

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Question catalog errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Failed to read questions file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed questions file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("Question '{0}' has an empty id or column name")]
    EmptyIdentifier(String),
}
