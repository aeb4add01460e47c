//! Metric subsystem
//!
//! Pure calculators mapping the cells of one group to a metric payload plus
//! the group's non-missing base.
//!
//! # Supported Metrics
//!
//! - `frequency`: code distribution with counts and percentages
//! - `mean`: arithmetic mean, sample std and n
//! - `top2box` / `bottom2box`: share of respondents in the scale's end codes
//! - `nps`: promoter share minus detractor share
//!
//! Empty bases produce `null` scalars, never an error.

mod boxes;
mod calculator;
mod errors;
mod frequency;
mod mean;
mod nps;
mod spec;
mod value;

pub use boxes::{BoxCalculator, BoxSide};
pub use calculator::Calculator;
pub use errors::{MetricError, MetricResult};
pub use nps::{NpsCalculator, DEFAULT_DETRACTOR_MAX, DEFAULT_PROMOTER_MIN};
pub use spec::{MetricParams, MetricSpec, MetricType};
pub use value::{FrequencyRow, MetricOutput, MetricValue};
