//! Segment definitions

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::predicate::FilterExpr;

use super::errors::{SegmentError, SegmentResult};

/// Prefix of derived complement ids
pub const COMPLEMENT_PREFIX: &str = "not_";

const SEGMENT_ID_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_\-]*$";

fn segment_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEGMENT_ID_PATTERN).expect("valid segment id regex"))
}

/// Id under which the complement of `segment_id` is published
pub fn complement_id(segment_id: &str) -> String {
    format!("{}{}", COMPLEMENT_PREFIX, segment_id)
}

/// A named, reusable respondent subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Empty when the builder left it to the engine
    #[serde(default)]
    pub segment_id: String,
    pub name: String,
    pub definition: FilterExpr,
    /// Informational only
    #[serde(default)]
    pub intended_partition: bool,
    #[serde(default)]
    pub notes: String,
}

impl SegmentSpec {
    pub fn new(segment_id: impl Into<String>, name: impl Into<String>, definition: FilterExpr) -> Self {
        Self {
            segment_id: segment_id.into(),
            name: name.into(),
            definition,
            intended_partition: false,
            notes: String::new(),
        }
    }

    /// Assigns `segment_<8 hex>` when no id was given
    pub fn ensure_id(&mut self) -> &str {
        if self.segment_id.trim().is_empty() {
            let simple = Uuid::new_v4().simple().to_string();
            self.segment_id = format!("segment_{}", &simple[..8]);
        }
        &self.segment_id
    }

    /// Checks the id against the allowed character set
    pub fn validate_id(&self) -> SegmentResult<()> {
        if segment_id_regex().is_match(&self.segment_id) {
            Ok(())
        } else {
            Err(SegmentError::InvalidId(self.segment_id.clone()))
        }
    }
}
