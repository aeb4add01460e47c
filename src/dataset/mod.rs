//! Response dataset subsystem
//!
//! The dataset is loaded once per session and is read-only afterwards.
//!
//! # Design Principles
//!
//! - Column-oriented, row-index-aligned
//! - Cells are JSON values; `null` is the only stored missing marker
//! - No type coercion on equality

pub mod cell;
mod errors;
mod loader;
mod table;

pub use errors::{DatasetError, DatasetResult};
pub use loader::DatasetLoader;
pub use table::{Column, Dataset};
