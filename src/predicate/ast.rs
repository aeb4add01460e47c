//! Filter expression AST
//!
//! A tagged tree of predicates over questions. Leaves reference questions by
//! id; inner nodes combine child masks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_inclusive() -> bool {
    true
}

/// Filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterExpr {
    /// Cell equals `value`
    Eq { question_id: String, value: Value },
    /// Cell is one of `values`
    In {
        question_id: String,
        values: Vec<Value>,
    },
    /// Numeric cell within `[min, max]` (or `(min, max)` when not inclusive).
    /// A missing bound leaves that side open.
    Range {
        question_id: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
    },
    /// Multi-choice selection intersects `values`
    ContainsAny {
        question_id: String,
        values: Vec<Value>,
    },
    /// All children hold; empty is all-true
    And { children: Vec<FilterExpr> },
    /// Any child holds; empty is all-false
    Or { children: Vec<FilterExpr> },
    /// Child does not hold
    Not { child: Box<FilterExpr> },
}

impl FilterExpr {
    /// Create an equality predicate
    pub fn eq(question_id: impl Into<String>, value: Value) -> Self {
        FilterExpr::Eq {
            question_id: question_id.into(),
            value,
        }
    }

    /// Create a membership predicate
    pub fn in_list(question_id: impl Into<String>, values: Vec<Value>) -> Self {
        FilterExpr::In {
            question_id: question_id.into(),
            values,
        }
    }

    /// Create an inclusive range predicate
    pub fn range(question_id: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        FilterExpr::Range {
            question_id: question_id.into(),
            min,
            max,
            inclusive: true,
        }
    }

    /// Create an exclusive range predicate
    pub fn range_exclusive(
        question_id: impl Into<String>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        FilterExpr::Range {
            question_id: question_id.into(),
            min,
            max,
            inclusive: false,
        }
    }

    /// Create a multi-choice intersection predicate
    pub fn contains_any(question_id: impl Into<String>, values: Vec<Value>) -> Self {
        FilterExpr::ContainsAny {
            question_id: question_id.into(),
            values,
        }
    }

    pub fn and(children: Vec<FilterExpr>) -> Self {
        FilterExpr::And { children }
    }

    pub fn or(children: Vec<FilterExpr>) -> Self {
        FilterExpr::Or { children }
    }

    pub fn negate(child: FilterExpr) -> Self {
        FilterExpr::Not {
            child: Box::new(child),
        }
    }

    /// Returns true for leaf predicates
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            FilterExpr::And { .. } | FilterExpr::Or { .. } | FilterExpr::Not { .. }
        )
    }

    /// Returns the operation name for diagnostics
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterExpr::Eq { .. } => "eq",
            FilterExpr::In { .. } => "in",
            FilterExpr::Range { .. } => "range",
            FilterExpr::ContainsAny { .. } => "contains_any",
            FilterExpr::And { .. } => "and",
            FilterExpr::Or { .. } => "or",
            FilterExpr::Not { .. } => "not",
        }
    }

    /// Question ids referenced by leaves, sorted and deduplicated
    pub fn question_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    /// Question id of a leaf
    pub fn question_id(&self) -> Option<&str> {
        match self {
            FilterExpr::Eq { question_id, .. }
            | FilterExpr::In { question_id, .. }
            | FilterExpr::Range { question_id, .. }
            | FilterExpr::ContainsAny { question_id, .. } => Some(question_id),
            _ => None,
        }
    }

    /// Leaf predicates in depth-first order
    pub fn leaves(&self) -> Vec<&FilterExpr> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FilterExpr>) {
        match self {
            FilterExpr::And { children } | FilterExpr::Or { children } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            FilterExpr::Not { child } => child.collect_leaves(out),
            leaf => out.push(leaf),
        }
    }

    fn collect_ids<'a>(&'a self, ids: &mut BTreeSet<&'a str>) {
        match self {
            FilterExpr::Eq { question_id, .. }
            | FilterExpr::In { question_id, .. }
            | FilterExpr::Range { question_id, .. }
            | FilterExpr::ContainsAny { question_id, .. } => {
                ids.insert(question_id.as_str());
            }
            FilterExpr::And { children } | FilterExpr::Or { children } => {
                for child in children {
                    child.collect_ids(ids);
                }
            }
            FilterExpr::Not { child } => child.collect_ids(ids),
        }
    }
}
