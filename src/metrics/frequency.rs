//! Frequency distribution
//!
//! Codes are listed in catalog option order (zero counts included), then any
//! further observed codes in first-seen order. Percentages are over the
//! non-missing base. For multi-choice questions every option is counted once
//! per respondent who selected it, so percentages need not sum to 100.

use serde_json::Value;

use crate::catalog::Question;
use crate::dataset::cell::{is_missing, same_code, selections};

use super::errors::{MetricError, MetricResult};
use super::value::{percentage, FrequencyRow, MetricOutput, MetricValue};

pub fn compute(cells: &[&Value], question: &Question) -> MetricResult<MetricOutput> {
    let mut codes: Vec<Value> = Vec::new();
    for option in &question.options {
        push_code(&mut codes, &option.code);
    }

    let answered: Vec<Vec<&Value>> = if question.question_type.is_multi_choice() {
        cells.iter().filter_map(|cell| selections(cell)).collect()
    } else {
        let mut answered = Vec::new();
        for cell in cells.iter().filter(|c| !is_missing(c)) {
            if cell.is_array() || cell.is_object() {
                return Err(MetricError::shape("frequency", cell, "a single code"));
            }
            answered.push(vec![*cell]);
        }
        answered
    };

    for picked in &answered {
        for code in picked {
            push_code(&mut codes, code);
        }
    }

    let base_n = answered.len();
    let distribution = codes
        .into_iter()
        .map(|code| {
            let count = answered
                .iter()
                .filter(|picked| picked.iter().any(|p| same_code(p, &code)))
                .count();
            FrequencyRow {
                label: question.option_label(&code).map(str::to_string),
                pct: percentage(count, base_n).unwrap_or(0.0),
                code,
                count,
            }
        })
        .collect();

    Ok(MetricOutput {
        value: MetricValue::Frequency { distribution },
        base_n,
    })
}

fn push_code(codes: &mut Vec<Value>, code: &Value) {
    if !codes.iter().any(|c| same_code(c, code)) {
        codes.push(code.clone());
    }
}
