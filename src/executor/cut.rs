//! Cut requests
//!
//! A cut is one metric, at most one honored grouping dimension and an
//! optional filter. Kinds arrive as strings and are parsed per cut, so an
//! unknown kind fails only the cut that uses it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metrics::MetricSpec;
use crate::predicate::FilterExpr;

use super::errors::{ExecutorError, ExecutorResult};

/// Kind of grouping dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    Question,
    Segment,
}

/// A grouping dimension: `{kind, id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub kind: String,
    pub id: String,
}

impl DimensionSpec {
    pub fn question(id: impl Into<String>) -> Self {
        Self {
            kind: "question".to_string(),
            id: id.into(),
        }
    }

    pub fn segment(id: impl Into<String>) -> Self {
        Self {
            kind: "segment".to_string(),
            id: id.into(),
        }
    }

    pub fn parse_kind(&self) -> ExecutorResult<DimensionKind> {
        match self.kind.as_str() {
            "question" => Ok(DimensionKind::Question),
            "segment" => Ok(DimensionKind::Segment),
            other => Err(ExecutorError::configuration(format!(
                "Unknown dimension kind: {}",
                other
            ))),
        }
    }

    /// `kind:id`, as listed in a table's dimensions
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

/// Cut filter: a segment id or raw expression string, or a filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CutFilter {
    Named(String),
    Expr(FilterExpr),
}

impl From<FilterExpr> for CutFilter {
    fn from(expr: FilterExpr) -> Self {
        CutFilter::Expr(expr)
    }
}

impl From<&str> for CutFilter {
    fn from(s: &str) -> Self {
        CutFilter::Named(s.to_string())
    }
}

/// One analytical request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSpec {
    pub cut_id: String,
    pub metric: MetricSpec,
    #[serde(default)]
    pub dimensions: Vec<DimensionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<CutFilter>,
}

impl CutSpec {
    pub fn new(cut_id: impl Into<String>, metric: MetricSpec) -> Self {
        Self {
            cut_id: cut_id.into(),
            metric,
            dimensions: Vec::new(),
            filter: None,
        }
    }

    pub fn with_dimension(mut self, dimension: DimensionSpec) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<CutFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Decodes one cut from JSON.
    ///
    /// On failure returns the best available cut id (`cut_id` if present,
    /// else `cut_<index>`) with the decoding error.
    pub fn decode(value: &Value, index: usize) -> Result<CutSpec, (String, ExecutorError)> {
        serde_json::from_value(value.clone()).map_err(|e| {
            let cut_id = value
                .get("cut_id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("cut_{}", index));
            (
                cut_id,
                ExecutorError::configuration(format!("Malformed cut: {}", e)),
            )
        })
    }
}
