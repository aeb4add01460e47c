//! Filter expression evaluation
//!
//! Turns a [`FilterExpr`] into a [`Mask`] over the full dataset.
//! Leaf rules:
//! - missing cells never match
//! - equality is type-aware, no string/number coercion
//! - ranges compare numerically
//! - contains_any needs a non-empty selection

use serde_json::Value;

use crate::catalog::QuestionCatalog;
use crate::dataset::cell::{as_number, is_missing, selections, values_match};
use crate::dataset::{Column, Dataset};

use super::ast::FilterExpr;
use super::errors::{PredicateError, PredicateResult};
use super::mask::Mask;

/// Evaluates filter trees against a dataset
pub struct PredicateEvaluator<'a> {
    dataset: &'a Dataset,
    catalog: &'a QuestionCatalog,
}

impl<'a> PredicateEvaluator<'a> {
    pub fn new(dataset: &'a Dataset, catalog: &'a QuestionCatalog) -> Self {
        Self { dataset, catalog }
    }

    /// Evaluates `expr`, returning a mask with one entry per dataset row.
    ///
    /// An unresolved question id fails immediately.
    pub fn evaluate(&self, expr: &FilterExpr) -> PredicateResult<Mask> {
        let rows = self.dataset.row_count();
        match expr {
            FilterExpr::Eq { question_id, value } => {
                let column = self.resolve(question_id)?;
                Ok(Self::leaf(column, rows, |cell| values_match(cell, value)))
            }
            FilterExpr::In {
                question_id,
                values,
            } => {
                let column = self.resolve(question_id)?;
                Ok(Self::leaf(column, rows, |cell| {
                    values.iter().any(|v| values_match(cell, v))
                }))
            }
            FilterExpr::Range {
                question_id,
                min,
                max,
                inclusive,
            } => {
                let column = self.resolve(question_id)?;
                Ok(Self::leaf(column, rows, |cell| {
                    Self::in_range(cell, *min, *max, *inclusive)
                }))
            }
            FilterExpr::ContainsAny {
                question_id,
                values,
            } => {
                let column = self.resolve(question_id)?;
                Ok(Self::leaf(column, rows, |cell| match selections(cell) {
                    Some(picked) => picked
                        .iter()
                        .any(|p| values.iter().any(|v| values_match(p, v))),
                    None => false,
                }))
            }
            FilterExpr::And { children } => {
                let mut mask = Mask::all(rows);
                for child in children {
                    mask = mask.and(&self.evaluate(child)?);
                }
                Ok(mask)
            }
            FilterExpr::Or { children } => {
                let mut mask = Mask::none(rows);
                for child in children {
                    mask = mask.or(&self.evaluate(child)?);
                }
                Ok(mask)
            }
            FilterExpr::Not { child } => Ok(self.evaluate(child)?.complement()),
        }
    }

    /// Resolves a question id to its dataset column
    fn resolve(&self, question_id: &str) -> PredicateResult<&'a Column> {
        let question = self
            .catalog
            .get(question_id)
            .ok_or_else(|| PredicateError::UnknownQuestion(question_id.to_string()))?;
        let column_name = question.effective_column_name();
        self.dataset
            .column(column_name)
            .ok_or_else(|| PredicateError::MissingColumn {
                question_id: question_id.to_string(),
                column: column_name.to_string(),
            })
    }

    fn leaf(column: &Column, rows: usize, test: impl Fn(&Value) -> bool) -> Mask {
        Mask::from_fn(rows, |i| match column.get(i) {
            Some(cell) if !is_missing(cell) => test(cell),
            _ => false,
        })
    }

    fn in_range(cell: &Value, min: Option<f64>, max: Option<f64>, inclusive: bool) -> bool {
        let v = match as_number(cell) {
            Some(v) => v,
            None => return false,
        };
        let above = match min {
            Some(lo) if inclusive => v >= lo,
            Some(lo) => v > lo,
            None => true,
        };
        let below = match max {
            Some(hi) if inclusive => v <= hi,
            Some(hi) => v < hi,
            None => true,
        };
        above && below
    }
}
