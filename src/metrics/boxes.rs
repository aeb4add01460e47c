//! Top-2-box and bottom-2-box
//!
//! The box is the two highest (top) or lowest (bottom) numeric codes of the
//! question unless `top_values` / `bottom_values` overrides it.

use serde_json::Value;

use crate::catalog::Question;

use super::errors::{MetricError, MetricResult};
use super::mean::numeric_cells;
use super::spec::{MetricParams, MetricType};
use super::value::{percentage, MetricOutput, MetricValue};

const BOX_WIDTH: usize = 2;

/// Which end of the scale the box sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSide {
    Top,
    Bottom,
}

impl BoxSide {
    fn param(&self) -> &'static str {
        match self {
            BoxSide::Top => "top_values",
            BoxSide::Bottom => "bottom_values",
        }
    }

    fn metric(&self) -> MetricType {
        match self {
            BoxSide::Top => MetricType::Top2Box,
            BoxSide::Bottom => MetricType::Bottom2Box,
        }
    }
}

/// A prepared box calculator with its resolved code set
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCalculator {
    side: BoxSide,
    codes: Vec<f64>,
}

impl BoxCalculator {
    /// Resolves the code set from params or the question's codes
    pub fn prepare(side: BoxSide, params: &MetricParams, question: &Question) -> MetricResult<Self> {
        let mut codes = match params.numbers(side.param())? {
            Some(codes) => codes,
            None => {
                let all = question.numeric_codes();
                if all.len() < BOX_WIDTH {
                    return Err(MetricError::NoDefaultCodes {
                        question_id: question.question_id.clone(),
                        metric: side.metric().to_string(),
                    });
                }
                match side {
                    BoxSide::Top => all[all.len() - BOX_WIDTH..].to_vec(),
                    BoxSide::Bottom => all[..BOX_WIDTH].to_vec(),
                }
            }
        };
        codes.sort_by(|a, b| a.total_cmp(b));
        codes.dedup();
        Ok(Self { side, codes })
    }

    pub fn codes(&self) -> &[f64] {
        &self.codes
    }

    pub fn compute(&self, cells: &[&Value]) -> MetricResult<MetricOutput> {
        let values = numeric_cells(cells, self.side.metric().as_str())?;
        let base_n = values.len();
        let count = values.iter().filter(|v| self.codes.contains(v)).count();
        let pct = percentage(count, base_n);

        let value = match self.side {
            BoxSide::Top => MetricValue::Top2Box {
                top2box_pct: pct,
                top_values: self.codes.clone(),
                count,
                base_n,
            },
            BoxSide::Bottom => MetricValue::Bottom2Box {
                bottom2box_pct: pct,
                bottom_values: self.codes.clone(),
                count,
                base_n,
            },
        };
        Ok(MetricOutput { value, base_n })
    }
}
