//! Loader for the response dataset
//!
//! `responses.json` holds a JSON list of row objects, one per respondent.
//! Multi-choice answers are JSON arrays of selected codes.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{DatasetError, DatasetResult};
use super::table::Dataset;

/// Reads response files into a [`Dataset`]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads the dataset from a JSON file on disk.
    pub fn load(path: &Path) -> DatasetResult<Dataset> {
        let content = fs::read_to_string(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            DatasetError::Malformed { reason, .. } => DatasetError::Malformed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parses a dataset from JSON text.
    pub fn from_json_str(content: &str) -> DatasetResult<Dataset> {
        let parsed: Value = serde_json::from_str(content).map_err(|e| DatasetError::Malformed {
            path: "<in-memory>".to_string(),
            reason: format!("Invalid JSON: {}", e),
        })?;

        let rows = match parsed {
            Value::Array(rows) => rows,
            _ => {
                return Err(DatasetError::Malformed {
                    path: "<in-memory>".to_string(),
                    reason: "expected a JSON list of response rows".to_string(),
                })
            }
        };

        let rows: Vec<Map<String, Value>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| match row {
                Value::Object(map) => Ok(map),
                _ => Err(DatasetError::RowNotObject(i)),
            })
            .collect::<DatasetResult<_>>()?;

        Ok(Dataset::from_rows(&rows))
    }
}
