//! Predicate subsystem
//!
//! Evaluates filter expressions into row masks over the full dataset.
//!
//! # Evaluation Rules
//!
//! - Every mask has exactly one entry per dataset row
//! - Missing cells never satisfy a leaf predicate
//! - Empty `and` is all-true, empty `or` is all-false
//! - Unresolved question ids fail immediately (no retry)

mod ast;
mod errors;
mod evaluator;
mod expression;
mod mask;

pub use ast::FilterExpr;
pub use errors::{PredicateError, PredicateResult};
pub use evaluator::PredicateEvaluator;
pub use expression::{CompareOp, RawExpr, RawFilter};
pub use mask::Mask;
