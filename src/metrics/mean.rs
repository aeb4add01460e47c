//! Arithmetic mean over non-missing numeric values

use serde_json::Value;

use crate::dataset::cell::{as_number, is_missing};

use super::errors::{MetricError, MetricResult};
use super::value::{MetricOutput, MetricValue};

/// Collects the numeric view of all non-missing cells.
///
/// A non-missing cell without a numeric view is a shape error.
pub(crate) fn numeric_cells(cells: &[&Value], metric: &str) -> MetricResult<Vec<f64>> {
    cells
        .iter()
        .filter(|c| !is_missing(c))
        .map(|c| as_number(c).ok_or_else(|| MetricError::shape(metric, c, "a numeric value")))
        .collect()
}

pub fn compute(cells: &[&Value]) -> MetricResult<MetricOutput> {
    let values = numeric_cells(cells, "mean")?;
    let n = values.len();

    let (mean, std) = if n == 0 {
        (None, None)
    } else {
        let mean = values.iter().sum::<f64>() / n as f64;
        // sample standard deviation
        let std = if n > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        } else {
            None
        };
        (Some(mean), std)
    };

    Ok(MetricOutput {
        value: MetricValue::Mean { mean, std, n },
        base_n: n,
    })
}
