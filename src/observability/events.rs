//! Observable engine events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Session inputs
    /// Configuration loaded
    ConfigLoaded,
    /// Question catalog loaded
    CatalogLoaded,
    /// Response dataset loaded
    DatasetLoaded,

    // Batch execution
    /// Batch received
    BatchStart,
    /// Batch finished
    BatchComplete,
    /// Cut produced a table
    CutComplete,
    /// Cut recorded as an error
    CutFailed,
    /// A group degraded to a null result
    GroupDegraded,

    // Segments
    /// Segment masks built
    SegmentsMaterialized,
    /// Segment accepted into the registry
    SegmentRegistered,
    /// Segment refused
    SegmentRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::DatasetLoaded => "DATASET_LOADED",

            Event::BatchStart => "BATCH_START",
            Event::BatchComplete => "BATCH_COMPLETE",
            Event::CutComplete => "CUT_COMPLETE",
            Event::CutFailed => "CUT_FAILED",
            Event::GroupDegraded => "GROUP_DEGRADED",

            Event::SegmentsMaterialized => "SEGMENTS_MATERIALIZED",
            Event::SegmentRegistered => "SEGMENT_REGISTERED",
            Event::SegmentRejected => "SEGMENT_REJECTED",
        }
    }

    /// Default log severity of the event
    pub fn severity(&self) -> Severity {
        match self {
            Event::CutFailed => Severity::Error,
            Event::GroupDegraded | Event::SegmentRejected => Severity::Warn,
            Event::CutComplete => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
