//! Net Promoter Score
//!
//! `nps = promoter_pct - detractor_pct` over non-missing respondents. Both
//! percentages share one base, so the score stays within [-100, 100].

use serde_json::Value;

use super::errors::{MetricError, MetricResult};
use super::mean::numeric_cells;
use super::spec::MetricParams;
use super::value::{percentage, round_pct, MetricOutput, MetricValue};

pub const DEFAULT_PROMOTER_MIN: f64 = 9.0;
pub const DEFAULT_DETRACTOR_MAX: f64 = 6.0;

/// A prepared NPS calculator with resolved thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpsCalculator {
    promoter_min: f64,
    detractor_max: f64,
}

impl Default for NpsCalculator {
    fn default() -> Self {
        Self {
            promoter_min: DEFAULT_PROMOTER_MIN,
            detractor_max: DEFAULT_DETRACTOR_MAX,
        }
    }
}

impl NpsCalculator {
    /// Reads `promoter_min` / `detractor_max` overrides.
    ///
    /// Thresholds that would classify one score as both promoter and
    /// detractor are rejected.
    pub fn prepare(params: &MetricParams) -> MetricResult<Self> {
        let promoter_min = params.number("promoter_min")?.unwrap_or(DEFAULT_PROMOTER_MIN);
        let detractor_max = params.number("detractor_max")?.unwrap_or(DEFAULT_DETRACTOR_MAX);
        if detractor_max >= promoter_min {
            return Err(MetricError::invalid_param(
                "detractor_max",
                format!(
                    "must be below promoter_min ({} >= {})",
                    detractor_max, promoter_min
                ),
            ));
        }
        Ok(Self {
            promoter_min,
            detractor_max,
        })
    }

    pub fn compute(&self, cells: &[&Value]) -> MetricResult<MetricOutput> {
        let scores = numeric_cells(cells, "nps")?;
        let base_n = scores.len();
        let promoters = scores.iter().filter(|s| **s >= self.promoter_min).count();
        let detractors = scores.iter().filter(|s| **s <= self.detractor_max).count();
        let passives = base_n - promoters - detractors;

        let promoter_pct = percentage(promoters, base_n);
        let detractor_pct = percentage(detractors, base_n);
        // taken from the reported percentages so the payload is self-consistent
        let nps = promoter_pct
            .zip(detractor_pct)
            .map(|(p, d)| round_pct(p - d));

        Ok(MetricOutput {
            value: MetricValue::Nps {
                nps,
                promoter_pct,
                passive_pct: percentage(passives, base_n),
                detractor_pct,
                promoters,
                passives,
                detractors,
                base_n,
            },
            base_n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(calc: &NpsCalculator, values: &[Value]) -> MetricOutput {
        let cells: Vec<&Value> = values.iter().collect();
        calc.compute(&cells).unwrap()
    }

    #[test]
    fn test_reference_sample() {
        let values: Vec<Value> = [9, 10, 8, 9, 3, 7, 9, 10, 2, 6].iter().map(|v| json!(v)).collect();
        let out = run(&NpsCalculator::default(), &values);

        assert_eq!(out.base_n, 10);
        match out.value {
            MetricValue::Nps {
                nps,
                promoter_pct,
                detractor_pct,
                promoters,
                detractors,
                passives,
                ..
            } => {
                assert_eq!(promoters, 5);
                assert_eq!(detractors, 3);
                assert_eq!(passives, 2);
                assert_eq!(promoter_pct, Some(50.0));
                assert_eq!(detractor_pct, Some(30.0));
                assert_eq!(nps, Some(20.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_bounds() {
        let calc = NpsCalculator::default();
        let all_promoters = run(&calc, &[json!(10), json!(9)]);
        assert_eq!(all_promoters.value.headline(), json!(100.0));

        let all_detractors = run(&calc, &[json!(0), json!(6), json!(null)]);
        assert_eq!(all_detractors.value.headline(), json!(-100.0));
        assert_eq!(all_detractors.base_n, 2);
    }

    #[test]
    fn test_threshold_overrides() {
        let mut params = MetricParams::new();
        params.insert("promoter_min", json!(8));
        params.insert("detractor_max", json!(5));
        let calc = NpsCalculator::prepare(&params).unwrap();
        let out = run(&calc, &[json!(8), json!(6), json!(5)]);
        assert_eq!(out.value.headline(), json!(0.0));
    }

    #[test]
    fn test_overlapping_thresholds_rejected() {
        let mut params = MetricParams::new();
        params.insert("detractor_max", json!(9));
        let err = NpsCalculator::prepare(&params).unwrap_err();
        assert!(matches!(err, MetricError::InvalidParam { .. }));
    }

    #[test]
    fn test_score_matches_reported_percentages() {
        // 1 promoter, 2 detractors of 7: 14.29 - 28.57
        let values: Vec<Value> = [10, 0, 1, 7, 7, 8, 8].iter().map(|v| json!(v)).collect();
        match run(&NpsCalculator::default(), &values).value {
            MetricValue::Nps {
                nps,
                promoter_pct,
                detractor_pct,
                ..
            } => {
                assert_eq!(promoter_pct, Some(14.29));
                assert_eq!(detractor_pct, Some(28.57));
                assert_eq!(nps, Some(-14.28));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_empty_base_is_null() {
        let out = run(&NpsCalculator::default(), &[]);
        assert_eq!(out.value.headline(), Value::Null);
    }
}
