//! Keyed, ordered question catalog

use std::collections::HashMap;

use super::errors::{CatalogError, CatalogResult};
use super::types::Question;

/// Read-only question catalog for a session.
///
/// Preserves load order for iteration and offers O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
}

impl QuestionCatalog {
    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn new(questions: Vec<Question>) -> CatalogResult<Self> {
        let mut by_id = HashMap::with_capacity(questions.len());
        for (i, q) in questions.iter().enumerate() {
            if q.question_id.trim().is_empty() || q.effective_column_name().trim().is_empty() {
                return Err(CatalogError::EmptyIdentifier(q.label.clone()));
            }
            if by_id.insert(q.question_id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateQuestion(q.question_id.clone()));
            }
        }
        Ok(Self { questions, by_id })
    }

    /// Looks up a question by id
    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.by_id.get(question_id).map(|&i| &self.questions[i])
    }

    /// Returns true if the id is known
    pub fn contains(&self, question_id: &str) -> bool {
        self.by_id.contains_key(question_id)
    }

    /// Resolves a question id to its dataset column
    pub fn resolve_column(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).map(Question::effective_column_name)
    }

    /// Iterates questions in load order
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
