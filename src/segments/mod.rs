//! Segment subsystem
//!
//! Named, reusable respondent subsets: definitions, a session registry with
//! insert-or-replace semantics, and a compute-once cache of their masks over
//! the full dataset.

mod cache;
mod errors;
mod registry;
mod spec;

pub use cache::{MaterializedSegments, SegmentCache};
pub use errors::{SegmentError, SegmentResult};
pub use registry::{validate_segment, SegmentCheck, SegmentRegistry};
pub use spec::{complement_id, SegmentSpec, COMPLEMENT_PREFIX};
