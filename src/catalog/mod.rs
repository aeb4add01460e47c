//! Question catalog subsystem
//!
//! The catalog maps question ids to their type, options and dataset column.
//! It is loaded once per session and never mutated afterwards.

mod catalog;
mod errors;
mod loader;
mod types;

pub use catalog::QuestionCatalog;
pub use errors::{CatalogError, CatalogResult};
pub use loader::CatalogLoader;
pub use types::{AnswerOption, Question, QuestionType};
