//! # Metric Errors

use thiserror::Error;

/// Result type for metric preparation and computation
pub type MetricResult<T> = Result<T, MetricError>;

/// Errors raised by metric calculators.
///
/// `UnknownType`, `InvalidParam` and `NoDefaultCodes` are detected while
/// preparing a calculator and fail the cut. `UnexpectedShape` is raised per
/// group and only degrades that group.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("Unknown metric type: {0}")]
    UnknownType(String),

    #[error("Invalid metric parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("Question '{question_id}' has no default codes for {metric}; pass explicit values")]
    NoDefaultCodes { question_id: String, metric: String },

    #[error("Unexpected value {value} for {metric}: expected {expected}")]
    UnexpectedShape {
        metric: String,
        value: String,
        expected: String,
    },
}

impl MetricError {
    /// Returns true if the error is a cut-level configuration problem
    pub fn is_configuration(&self) -> bool {
        !matches!(self, MetricError::UnexpectedShape { .. })
    }

    pub(crate) fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        MetricError::InvalidParam {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(metric: &str, value: &serde_json::Value, expected: &str) -> Self {
        MetricError::UnexpectedShape {
            metric: metric.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}
