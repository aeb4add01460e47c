//! Executor error types
//!
//! Error codes:
//! - CONFIGURATION_ERROR (CUT_FATAL)
//! - DATA_ERROR (CUT_FATAL)
//! - COMPUTATION_ERROR (DEGRADED)
//!
//! Errors are captured at the smallest scope that can continue: a
//! computation error degrades one group, the others fail one cut. Nothing
//! here aborts a batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricError;
use crate::predicate::PredicateError;
use crate::segments::SegmentError;

/// How far an error reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// One group yields null; the cut still succeeds
    Degraded,
    /// The cut is recorded as failed; the batch continues
    CutFatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Degraded => write!(f, "DEGRADED"),
            Severity::CutFatal => write!(f, "CUT_FATAL"),
        }
    }
}

/// Error taxonomy of the execution engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown metric type, unresolved question or segment id, bad filter
    #[serde(rename = "CONFIGURATION_ERROR")]
    Configuration,
    /// Per-group metric failure
    #[serde(rename = "COMPUTATION_ERROR")]
    Computation,
    /// Target column absent from the dataset
    #[serde(rename = "DATA_ERROR")]
    Data,
}

impl ErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Computation => "COMPUTATION_ERROR",
            ErrorKind::Data => "DATA_ERROR",
        }
    }

    /// Returns the severity level for this kind
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::Computation => Severity::Degraded,
            _ => Severity::CutFatal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error with kind and message
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorError {
    kind: ErrorKind,
    message: String,
}

impl ExecutorError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            message: reason.into(),
        }
    }

    /// Create a per-group computation error
    pub fn computation(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Computation,
            message: reason.into(),
        }
    }

    /// Create a data error
    pub fn data(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Data,
            message: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this error fails the whole cut
    pub fn is_cut_fatal(&self) -> bool {
        self.severity() == Severity::CutFatal
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.kind.severity(),
            self.kind.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {}

impl From<PredicateError> for ExecutorError {
    fn from(err: PredicateError) -> Self {
        match err {
            PredicateError::MissingColumn { .. } => ExecutorError::data(err.to_string()),
            _ => ExecutorError::configuration(err.to_string()),
        }
    }
}

impl From<MetricError> for ExecutorError {
    fn from(err: MetricError) -> Self {
        if err.is_configuration() {
            ExecutorError::configuration(err.to_string())
        } else {
            ExecutorError::computation(err.to_string())
        }
    }
}

impl From<SegmentError> for ExecutorError {
    fn from(err: SegmentError) -> Self {
        match &err {
            SegmentError::Materialize {
                source: PredicateError::MissingColumn { .. },
                ..
            } => ExecutorError::data(err.to_string()),
            _ => ExecutorError::configuration(err.to_string()),
        }
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
