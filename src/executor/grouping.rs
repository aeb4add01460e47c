//! Cross-tab grouping
//!
//! Every grouping produces an ordered sequence of `(label, mask)` pairs over
//! the full row index, whatever the grouping key is.

use serde_json::Value;

use crate::catalog::Question;
use crate::dataset::cell::{code_label, is_missing, selections};
use crate::dataset::Column;
use crate::predicate::Mask;
use crate::segments::complement_id;

/// One cross-tab group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub label: String,
    pub mask: Mask,
}

/// Groups the rows of `base` by the labels of a question dimension.
///
/// Labels are the question's option codes in catalog order, then further
/// observed values in first-seen row order. Rows with a missing dimension
/// value fall in no group. Multi-choice rows join every group they
/// selected, so those groups may overlap. Option groups with no rows are
/// kept so that they show up as empty.
pub fn question_groups(base: &Mask, column: &Column, question: &Question) -> Vec<Group> {
    let multi = question.question_type.is_multi_choice();
    let row_labels: Vec<Vec<String>> = (0..base.len())
        .map(|i| match column.get(i) {
            Some(cell) if base.get(i) && !is_missing(cell) => cell_labels(cell, multi),
            _ => Vec::new(),
        })
        .collect();

    let mut labels: Vec<String> = Vec::new();
    let option_labels = question.options.iter().map(|o| code_label(&o.code));
    let observed = row_labels.iter().flatten().cloned();
    for label in option_labels.chain(observed) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels
        .into_iter()
        .map(|label| {
            let mask = Mask::from_fn(base.len(), |i| row_labels[i].contains(&label));
            Group { label, mask }
        })
        .collect()
}

fn cell_labels(cell: &Value, multi: bool) -> Vec<String> {
    if multi {
        let mut out: Vec<String> = Vec::new();
        for code in selections(cell).unwrap_or_default() {
            let label = code_label(code);
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    } else {
        vec![code_label(cell)]
    }
}

/// Splits `base` into a segment group and its complement.
///
/// The segment mask is realigned to the base row by row: a row is in the
/// segment group only if it is in the base and in the segment. The two
/// groups partition the base.
pub fn segment_groups(base: &Mask, segment_id: &str, segment: &Mask) -> Vec<Group> {
    let inside = base.and(segment);
    let outside = Mask::from_fn(base.len(), |i| base.get(i) && !inside.get(i));
    vec![
        Group {
            label: segment_id.to_string(),
            mask: inside,
        },
        Group {
            label: complement_id(segment_id),
            mask: outside,
        },
    ]
}
