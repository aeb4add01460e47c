//! # Segment Errors

use thiserror::Error;

use crate::predicate::PredicateError;

/// Result type for segment operations
pub type SegmentResult<T> = Result<T, SegmentError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("Invalid segment id '{0}': use letters, digits, '_' or '-'")]
    InvalidId(String),

    #[error("Segment id '{0}' collides with a complement id")]
    ReservedId(String),

    #[error("Segment '{segment_id}' references unknown question '{question_id}'")]
    UnknownQuestion {
        segment_id: String,
        question_id: String,
    },

    #[error("Segment '{0}' not found")]
    NotFound(String),

    #[error("Segment '{segment_id}' could not be materialized: {source}")]
    Materialize {
        segment_id: String,
        #[source]
        source: PredicateError,
    },
}

impl SegmentError {
    /// Stable code used in collaborator messages
    pub fn code(&self) -> &'static str {
        match self {
            SegmentError::InvalidId(_) => "INVALID_SEGMENT_ID",
            SegmentError::ReservedId(_) => "RESERVED_SEGMENT_ID",
            SegmentError::UnknownQuestion { .. } => "UNKNOWN_QUESTION",
            SegmentError::NotFound(_) => "SEGMENT_NOT_FOUND",
            SegmentError::Materialize { .. } => "SEGMENT_MATERIALIZE_FAILED",
        }
    }
}
