//! Session-scoped segment registry

use std::collections::BTreeMap;

use crate::catalog::QuestionCatalog;
use crate::predicate::FilterExpr;

use super::errors::{SegmentError, SegmentResult};
use super::spec::{complement_id, SegmentSpec, COMPLEMENT_PREFIX};

/// Outcome of checking a segment against the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentCheck {
    pub errors: Vec<SegmentError>,
    pub warnings: Vec<String>,
}

impl SegmentCheck {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a segment definition against the catalog.
///
/// Every referenced question must exist. `contains_any` on a question that
/// is not multi-choice is allowed but reported as a warning.
pub fn validate_segment(spec: &SegmentSpec, catalog: &QuestionCatalog) -> SegmentCheck {
    let mut check = SegmentCheck::default();
    if let Err(e) = spec.validate_id() {
        check.errors.push(e);
    }

    for question_id in spec.definition.question_ids() {
        if !catalog.contains(question_id) {
            check.errors.push(SegmentError::UnknownQuestion {
                segment_id: spec.segment_id.clone(),
                question_id: question_id.to_string(),
            });
        }
    }

    for leaf in spec.definition.leaves() {
        if let FilterExpr::ContainsAny { question_id, .. } = leaf {
            if let Some(q) = catalog.get(question_id) {
                if !q.question_type.is_multi_choice() {
                    check.warnings.push(format!(
                        "contains_any on '{}' which is {}, not multi_choice",
                        question_id, q.question_type
                    ));
                }
            }
        }
    }
    check
}

/// Segments keyed by id with insert-or-replace semantics.
///
/// Iteration is in id order so materialization is reproducible.
#[derive(Debug, Clone, Default)]
pub struct SegmentRegistry {
    segments: BTreeMap<String, SegmentSpec>,
}

impl SegmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every spec in order; later duplicates replace earlier ones
    pub fn from_specs(specs: Vec<SegmentSpec>) -> SegmentResult<Self> {
        let mut registry = Self::new();
        for spec in specs {
            registry.insert(spec)?;
        }
        Ok(registry)
    }

    /// Inserts or replaces a segment, returning the replaced definition.
    ///
    /// Rejects ids outside the allowed set and ids that would collide with
    /// another segment's complement.
    pub fn insert(&mut self, spec: SegmentSpec) -> SegmentResult<Option<SegmentSpec>> {
        spec.validate_id()?;
        let id = spec.segment_id.as_str();
        let shadows_complement = id
            .strip_prefix(COMPLEMENT_PREFIX)
            .map_or(false, |base| self.segments.contains_key(base));
        if shadows_complement || self.segments.contains_key(&complement_id(id)) {
            return Err(SegmentError::ReservedId(id.to_string()));
        }
        Ok(self.segments.insert(spec.segment_id.clone(), spec))
    }

    pub fn get(&self, segment_id: &str) -> Option<&SegmentSpec> {
        self.segments.get(segment_id)
    }

    pub fn contains(&self, segment_id: &str) -> bool {
        self.segments.contains_key(segment_id)
    }

    /// Segments in id order
    pub fn iter(&self) -> impl Iterator<Item = &SegmentSpec> {
        self.segments.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
