//! Engine configuration
//!
//! A single JSON file names the data directory, the input files inside
//! it and the base-size thresholds handed to the executor. Only
//! `data_dir` is required.

mod errors;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::executor::{BaseSizeThresholds, DEFAULT_MIN_BASE_SIZE, DEFAULT_WARN_BASE_SIZE};

pub use errors::{ConfigError, ConfigResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the input files (required)
    pub data_dir: String,

    /// Question catalog file, relative to `data_dir`
    #[serde(default = "default_questions_file")]
    pub questions_file: String,

    /// Response rows file, relative to `data_dir`
    #[serde(default = "default_responses_file")]
    pub responses_file: String,

    /// Optional list of segment definitions, relative to `data_dir`
    #[serde(default)]
    pub segments_file: Option<String>,

    #[serde(default = "default_min_base_size")]
    pub min_base_size: usize,

    #[serde(default = "default_warn_base_size")]
    pub warn_base_size: usize,
}

fn default_questions_file() -> String {
    "questions.json".to_string()
}
fn default_responses_file() -> String {
    "responses.json".to_string()
}
fn default_min_base_size() -> usize {
    DEFAULT_MIN_BASE_SIZE
}
fn default_warn_base_size() -> usize {
    DEFAULT_WARN_BASE_SIZE
}

impl EngineConfig {
    /// Creates a config with default file names and thresholds.
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            questions_file: default_questions_file(),
            responses_file: default_responses_file(),
            segments_file: None,
            min_base_size: DEFAULT_MIN_BASE_SIZE,
            warn_base_size: DEFAULT_WARN_BASE_SIZE,
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "data_dir" });
        }
        if self.questions_file.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "questions_file",
            });
        }
        if self.responses_file.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "responses_file",
            });
        }
        if matches!(&self.segments_file, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::EmptyField {
                field: "segments_file",
            });
        }

        if self.warn_base_size == 0 {
            return Err(ConfigError::Invalid("warn_base_size must be > 0".into()));
        }
        if self.min_base_size > self.warn_base_size {
            return Err(ConfigError::Invalid(format!(
                "min_base_size ({}) must not exceed warn_base_size ({})",
                self.min_base_size, self.warn_base_size
            )));
        }

        Ok(())
    }

    /// Thresholds for base-size diagnostics
    pub fn thresholds(&self) -> BaseSizeThresholds {
        BaseSizeThresholds::new(self.min_base_size, self.warn_base_size)
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn questions_path(&self) -> PathBuf {
        self.data_path().join(&self.questions_file)
    }

    pub fn responses_path(&self) -> PathBuf {
        self.data_path().join(&self.responses_file)
    }

    pub fn segments_path(&self) -> Option<PathBuf> {
        self.segments_file
            .as_ref()
            .map(|name| self.data_path().join(name))
    }
}
