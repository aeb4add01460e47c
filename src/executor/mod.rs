//! Executor subsystem
//!
//! Consumes cut batches and produces deterministic tables.
//!
//! # Execution Flow (per cut)
//!
//! 1. Resolve the base filter
//! 2. Resolve the metric column
//! 3. Branch on dimensions (none, question, segment)
//! 4. Assemble the table with base-size warnings
//!
//! # Invariants
//!
//! - Cuts are isolated: one failing cut never aborts the batch
//! - A failing group degrades to null; it never fails the cut
//! - A segment dimension yields exactly two groups that partition the base
//! - Identical cuts over an unchanged dataset yield identical tables

mod admission;
mod cut;
mod diagnostics;
mod errors;
mod executor;
mod grouping;
mod result;

pub use admission::SegmentAdmission;
pub use cut::{CutFilter, CutSpec, DimensionKind, DimensionSpec};
pub use diagnostics::{BaseSizeThresholds, DEFAULT_MIN_BASE_SIZE, DEFAULT_WARN_BASE_SIZE};
pub use errors::{ErrorKind, ExecutorError, ExecutorResult, Severity};
pub use executor::Executor;
pub use grouping::{question_groups, segment_groups, Group};
pub use result::{CrossTab, CutError, ExecutionResult, ResultData, TableResult, TableRow};
