//! Metric dispatch
//!
//! A [`Calculator`] is prepared once per cut (type and params are checked
//! there) and then run over every group of that cut.

use serde_json::Value;

use crate::catalog::Question;

use super::boxes::{BoxCalculator, BoxSide};
use super::errors::MetricResult;
use super::nps::NpsCalculator;
use super::spec::{MetricSpec, MetricType};
use super::value::MetricOutput;
use super::{frequency, mean};

/// A metric ready to run against group cells
#[derive(Debug, Clone, PartialEq)]
pub enum Calculator {
    Frequency(Question),
    Mean,
    Box(BoxCalculator),
    Nps(NpsCalculator),
}

impl Calculator {
    /// Validates the metric type and params against the target question
    pub fn prepare(spec: &MetricSpec, question: &Question) -> MetricResult<Self> {
        Ok(match spec.kind()? {
            MetricType::Frequency => Calculator::Frequency(question.clone()),
            MetricType::Mean => Calculator::Mean,
            MetricType::Top2Box => {
                Calculator::Box(BoxCalculator::prepare(BoxSide::Top, &spec.params, question)?)
            }
            MetricType::Bottom2Box => {
                Calculator::Box(BoxCalculator::prepare(BoxSide::Bottom, &spec.params, question)?)
            }
            MetricType::Nps => Calculator::Nps(NpsCalculator::prepare(&spec.params)?),
        })
    }

    /// Computes the metric over the cells of one group
    pub fn compute(&self, cells: &[&Value]) -> MetricResult<MetricOutput> {
        match self {
            Calculator::Frequency(question) => frequency::compute(cells, question),
            Calculator::Mean => mean::compute(cells),
            Calculator::Box(calc) => calc.compute(cells),
            Calculator::Nps(calc) => calc.compute(cells),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionType;
    use crate::metrics::MetricError;
    use serde_json::json;

    #[test]
    fn test_prepare_rejects_unknown_type() {
        let spec: MetricSpec =
            serde_json::from_value(json!({"type": "median", "question_id": "Q"})).unwrap();
        let q = Question::new("Q", "q", QuestionType::Numeric);
        let err = Calculator::prepare(&spec, &q).unwrap_err();
        assert_eq!(err, MetricError::UnknownType("median".into()));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_dispatch() {
        let q = Question::new("Q", "q", QuestionType::Likert1To5);
        let values = [json!(5), json!(4), json!(3), json!(5), json!(2)];
        let cells: Vec<&Value> = values.iter().collect();

        let top = Calculator::prepare(&MetricSpec::new(MetricType::Top2Box, "Q"), &q).unwrap();
        assert_eq!(top.compute(&cells).unwrap().value.headline(), json!(60.0));

        let mean = Calculator::prepare(&MetricSpec::new(MetricType::Mean, "Q"), &q).unwrap();
        assert_eq!(mean.compute(&cells).unwrap().value.headline(), json!(3.8));
    }
}
