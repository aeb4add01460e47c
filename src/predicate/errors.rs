//! # Predicate Errors

use thiserror::Error;

/// Result type for predicate evaluation
pub type PredicateResult<T> = Result<T, PredicateError>;

/// Errors raised while evaluating filters.
///
/// All of these are fail-fast configuration problems; evaluation is never
/// retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredicateError {
    #[error("Unknown question id in filter: {0}")]
    UnknownQuestion(String),

    #[error("Column '{column}' for question '{question_id}' not found in dataset")]
    MissingColumn { question_id: String, column: String },

    #[error("Could not parse filter string '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Could not parse filter string '{input}': unknown column '{column}'")]
    UnknownColumn { input: String, column: String },
}

impl PredicateError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PredicateError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
