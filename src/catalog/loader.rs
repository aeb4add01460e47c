//! Question catalog loader
//!
//! `questions.json` is either a JSON list of questions or an object with a
//! `questions` list. Malformed files and duplicate ids fail the load.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::catalog::QuestionCatalog;
use super::errors::{CatalogError, CatalogResult};
use super::types::Question;

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsFile {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

/// Reads question files into a [`QuestionCatalog`]
pub struct CatalogLoader;

impl CatalogLoader {
    /// Loads the catalog from disk.
    pub fn load(path: &Path) -> CatalogResult<QuestionCatalog> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parses a catalog from JSON text.
    pub fn from_json_str(content: &str) -> CatalogResult<QuestionCatalog> {
        Self::parse(content, "<in-memory>")
    }

    fn parse(content: &str, origin: &str) -> CatalogResult<QuestionCatalog> {
        let file: QuestionsFile =
            serde_json::from_str(content).map_err(|e| CatalogError::Malformed {
                path: origin.to_string(),
                reason: format!("Invalid questions JSON: {}", e),
            })?;

        let questions = match file {
            QuestionsFile::List(questions) => questions,
            QuestionsFile::Wrapped { questions } => questions,
        };

        QuestionCatalog::new(questions)
    }
}
