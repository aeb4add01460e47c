//! Metric requests
//!
//! `MetricSpec.type` stays a plain string on the wire so that an unknown
//! metric type reaches the executor and fails only the cut that names it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::cell::as_number;

use super::errors::{MetricError, MetricResult};

/// Supported metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    Frequency,
    Mean,
    Top2Box,
    Bottom2Box,
    Nps,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Frequency => "frequency",
            MetricType::Mean => "mean",
            MetricType::Top2Box => "top2box",
            MetricType::Bottom2Box => "bottom2box",
            MetricType::Nps => "nps",
        }
    }
}

impl FromStr for MetricType {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequency" => Ok(MetricType::Frequency),
            "mean" => Ok(MetricType::Mean),
            "top2box" => Ok(MetricType::Top2Box),
            "bottom2box" => Ok(MetricType::Bottom2Box),
            "nps" => Ok(MetricType::Nps),
            other => Err(MetricError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open key-value parameters of a metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricParams(BTreeMap<String, Value>);

impl MetricParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Numeric parameter, or `None` when absent
    pub fn number(&self, key: &str) -> MetricResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => as_number(v)
                .map(Some)
                .ok_or_else(|| MetricError::invalid_param(key, format!("expected a number, got {}", v))),
        }
    }

    /// Numeric list parameter, or `None` when absent
    pub fn numbers(&self, key: &str) -> MetricResult<Option<Vec<f64>>> {
        let items = match self.get(key) {
            None => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(v) => {
                return Err(MetricError::invalid_param(
                    key,
                    format!("expected a list of codes, got {}", v),
                ))
            }
        };
        if items.is_empty() {
            return Err(MetricError::invalid_param(key, "list must not be empty"));
        }
        items
            .iter()
            .map(|v| {
                as_number(v).ok_or_else(|| {
                    MetricError::invalid_param(key, format!("code {} is not numeric", v))
                })
            })
            .collect::<MetricResult<Vec<f64>>>()
            .map(Some)
    }
}

/// A metric request: type, target question and parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub question_id: String,
    #[serde(default)]
    pub params: MetricParams,
}

impl MetricSpec {
    pub fn new(metric_type: MetricType, question_id: impl Into<String>) -> Self {
        Self {
            metric_type: metric_type.as_str().to_string(),
            question_id: question_id.into(),
            params: MetricParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Parses the metric type
    pub fn kind(&self) -> MetricResult<MetricType> {
        self.metric_type.parse()
    }
}
