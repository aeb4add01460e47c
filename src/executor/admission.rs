//! Segment admission from collaborator outcomes

use serde::Serialize;
use serde_json::{json, Value};

use crate::contracts::{ToolMessage, ToolOutcome};
use crate::observability::{Event, Logger};
use crate::segments::{validate_segment, SegmentSpec};

use super::executor::Executor;

/// What happened to a segment handed over by a builder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentAdmission {
    /// Validated and registered
    Registered {
        segment_id: String,
        replaced: bool,
        warnings: Vec<String>,
    },
    /// The builder asked for clarification; nothing was registered
    AwaitingInput { prompt: String, options: Vec<Value> },
    /// Builder failure or failed validation
    Rejected { errors: Vec<ToolMessage> },
}

impl Executor {
    /// Admits a builder outcome into the segment registry.
    ///
    /// A successful outcome is validated against the catalog first; a
    /// missing id is assigned. Registering resets the segment cache.
    pub fn admit_segment(&mut self, outcome: ToolOutcome<SegmentSpec>) -> SegmentAdmission {
        match outcome {
            ToolOutcome::Success { data, warnings } => self.admit_spec(data, warnings),
            ToolOutcome::NeedsInput { prompt, options } => {
                SegmentAdmission::AwaitingInput { prompt, options }
            }
            ToolOutcome::Failure { errors } => {
                Self::log_rejected("", &errors);
                SegmentAdmission::Rejected { errors }
            }
        }
    }

    fn admit_spec(&mut self, mut spec: SegmentSpec, builder_warnings: Vec<ToolMessage>) -> SegmentAdmission {
        let segment_id = spec.ensure_id().to_string();

        let check = validate_segment(&spec, self.catalog());
        if !check.is_valid() {
            let errors: Vec<ToolMessage> = check
                .errors
                .iter()
                .map(|e| {
                    ToolMessage::new(e.code(), e.to_string()).with_context("segment_id", json!(segment_id))
                })
                .collect();
            Self::log_rejected(&segment_id, &errors);
            return SegmentAdmission::Rejected { errors };
        }

        match self.register_segment(spec) {
            Ok(replaced) => {
                let mut warnings: Vec<String> =
                    builder_warnings.into_iter().map(|w| w.message).collect();
                warnings.extend(check.warnings);
                SegmentAdmission::Registered {
                    segment_id,
                    replaced: replaced.is_some(),
                    warnings,
                }
            }
            Err(e) => {
                let errors = vec![ToolMessage::new(e.code(), e.to_string())
                    .with_context("segment_id", json!(segment_id))];
                Self::log_rejected(&segment_id, &errors);
                SegmentAdmission::Rejected { errors }
            }
        }
    }

    fn log_rejected(segment_id: &str, errors: &[ToolMessage]) {
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        Logger::event(
            Event::SegmentRejected,
            &[("segment_id", segment_id), ("codes", &codes.join(","))],
        );
    }
}
