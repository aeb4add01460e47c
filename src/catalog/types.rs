//! Question catalog types
//!
//! Supported question types:
//! - nps_0_10: 0-10 recommendation scale
//! - likert_1_5 / likert_1_7: ordinal agreement scales
//! - numeric: free numeric answer
//! - single_choice: one option code per respondent
//! - multi_choice: a set of option codes per respondent

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::cell::{as_number, same_code};

/// Question types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "nps_0_10")]
    Nps0To10,
    #[serde(rename = "likert_1_5")]
    Likert1To5,
    #[serde(rename = "likert_1_7")]
    Likert1To7,
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "single_choice")]
    SingleChoice,
    #[serde(rename = "multi_choice")]
    MultiChoice,
}

impl QuestionType {
    /// Returns the wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Nps0To10 => "nps_0_10",
            QuestionType::Likert1To5 => "likert_1_5",
            QuestionType::Likert1To7 => "likert_1_7",
            QuestionType::Numeric => "numeric",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiChoice => "multi_choice",
        }
    }

    /// Returns true for likert scales
    pub fn is_likert(&self) -> bool {
        matches!(self, QuestionType::Likert1To5 | QuestionType::Likert1To7)
    }

    /// Returns true for multi-choice questions
    pub fn is_multi_choice(&self) -> bool {
        matches!(self, QuestionType::MultiChoice)
    }

    /// Inclusive code range of fixed scales
    pub fn scale(&self) -> Option<(i64, i64)> {
        match self {
            QuestionType::Nps0To10 => Some((0, 10)),
            QuestionType::Likert1To5 => Some((1, 5)),
            QuestionType::Likert1To7 => Some((1, 7)),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An answer option of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option code as stored in the dataset
    pub code: Value,
    /// Human-readable label
    pub label: String,
}

impl AnswerOption {
    pub fn new(code: Value, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// A survey question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier
    pub question_id: String,
    /// Question text
    pub label: String,
    /// Question type
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Ordered answer options
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    /// Dataset column, when it differs from the question id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

impl Question {
    /// Creates a question whose column is named after its id
    pub fn new(
        question_id: impl Into<String>,
        label: impl Into<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            label: label.into(),
            question_type,
            options: Vec::new(),
            column_name: None,
        }
    }

    /// Sets the answer options
    pub fn with_options(mut self, options: Vec<AnswerOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets an explicit dataset column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// The dataset column holding this question's answers
    pub fn effective_column_name(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.question_id)
    }

    /// Returns the label of the option matching `code`
    pub fn option_label(&self, code: &Value) -> Option<&str> {
        self.options
            .iter()
            .find(|o| same_code(code, &o.code))
            .map(|o| o.label.as_str())
    }

    /// Numeric option codes in ascending order.
    ///
    /// Falls back to the fixed scale of nps/likert questions when the
    /// question carries no numeric options.
    pub fn numeric_codes(&self) -> Vec<f64> {
        let mut codes: Vec<f64> = self.options.iter().filter_map(|o| as_number(&o.code)).collect();
        if codes.is_empty() {
            if let Some((lo, hi)) = self.question_type.scale() {
                codes = (lo..=hi).map(|c| c as f64).collect();
            }
        }
        codes.sort_by(|a, b| a.total_cmp(b));
        codes.dedup();
        codes
    }
}
