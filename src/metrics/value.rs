//! Metric result payloads

use serde::Serialize;
use serde_json::{json, Value};

/// Rounds a percentage to two decimals
pub(crate) fn round_pct(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / base` as a rounded percentage, `None` on an empty base
pub(crate) fn percentage(part: usize, base: usize) -> Option<f64> {
    if base == 0 {
        None
    } else {
        Some(round_pct(part as f64 * 100.0 / base as f64))
    }
}

/// One code of a frequency distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub code: Value,
    pub label: Option<String>,
    pub count: usize,
    pub pct: f64,
}

impl FrequencyRow {
    fn to_json(&self) -> Value {
        json!({
            "code": self.code,
            "label": self.label,
            "count": self.count,
            "pct": self.pct,
        })
    }
}

/// Metric payload.
///
/// Serializes as a plain object whose keys depend on the metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Frequency {
        distribution: Vec<FrequencyRow>,
    },
    Mean {
        mean: Option<f64>,
        std: Option<f64>,
        n: usize,
    },
    Top2Box {
        top2box_pct: Option<f64>,
        top_values: Vec<f64>,
        count: usize,
        base_n: usize,
    },
    Bottom2Box {
        bottom2box_pct: Option<f64>,
        bottom_values: Vec<f64>,
        count: usize,
        base_n: usize,
    },
    Nps {
        nps: Option<f64>,
        promoter_pct: Option<f64>,
        passive_pct: Option<f64>,
        detractor_pct: Option<f64>,
        promoters: usize,
        passives: usize,
        detractors: usize,
        base_n: usize,
    },
}

impl MetricValue {
    /// The single number a cross-tab row reports for this metric.
    ///
    /// Frequency has no scalar; its whole distribution is returned.
    pub fn headline(&self) -> Value {
        let scalar = match self {
            MetricValue::Frequency { distribution } => {
                return Value::Array(distribution.iter().map(FrequencyRow::to_json).collect())
            }
            MetricValue::Mean { mean, .. } => *mean,
            MetricValue::Top2Box { top2box_pct, .. } => *top2box_pct,
            MetricValue::Bottom2Box { bottom2box_pct, .. } => *bottom2box_pct,
            MetricValue::Nps { nps, .. } => *nps,
        };
        scalar.map(Value::from).unwrap_or(Value::Null)
    }
}

/// A computed metric plus the base it was computed over
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOutput {
    pub value: MetricValue,
    pub base_n: usize,
}
