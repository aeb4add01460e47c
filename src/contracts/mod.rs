//! Collaborator result contracts
//!
//! External builders (for example a segment builder) report back with a
//! [`ToolOutcome`]: a value, a request for clarification, or a failure.
//! Each case is its own variant; nothing is inferred from optional fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A coded diagnostic from a collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, Value>,
}

impl ToolMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// Result of a collaborator call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome<T> {
    /// Value produced, possibly with warnings
    Success {
        data: T,
        #[serde(default)]
        warnings: Vec<ToolMessage>,
    },
    /// The collaborator needs a choice from the user before it can finish
    NeedsInput {
        prompt: String,
        #[serde(default)]
        options: Vec<Value>,
    },
    Failure {
        errors: Vec<ToolMessage>,
    },
}

impl<T> ToolOutcome<T> {
    pub fn success(data: T) -> Self {
        ToolOutcome::Success {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn needs_input(prompt: impl Into<String>, options: Vec<Value>) -> Self {
        ToolOutcome::NeedsInput {
            prompt: prompt.into(),
            options,
        }
    }

    pub fn failure(errors: Vec<ToolMessage>) -> Self {
        ToolOutcome::Failure { errors }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}
