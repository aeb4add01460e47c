//! surveycut - deterministic execution of survey cuts
//!
//! Computes survey metrics (frequency, mean, top/bottom box, NPS) over a
//! pre-loaded response dataset, optionally filtered and cross-tabulated by
//! a question or a reusable segment.
//!
//! # Subsystems
//!
//! - [`catalog`]: question metadata
//! - [`dataset`]: column-oriented response table
//! - [`predicate`]: filter expressions and row masks
//! - [`metrics`]: metric calculators
//! - [`segments`]: segment registry and compute-once mask cache
//! - [`executor`]: cut batches, grouping and result assembly
//! - [`contracts`]: discriminated collaborator outcomes
//! - [`observability`]: structured JSON-line logging
//! - [`config`], [`cli`]: the command line front end

pub mod catalog;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod dataset;
pub mod executor;
pub mod metrics;
pub mod observability;
pub mod predicate;
pub mod segments;
