//! Compute-once segment masks
//!
//! Every registered segment is evaluated over the full dataset the first
//! time any segment is needed. The complement of each segment is published
//! under `not_<segment_id>`. After that, lookups are map hits until the
//! cache is reset.
//!
//! # Invariants
//!
//! - `count(S) + count(not_S) == row_count` for every materialized S
//! - Materialization runs at most once per reset
//! - A segment whose definition fails to evaluate is recorded, not published

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::catalog::QuestionCatalog;
use crate::dataset::Dataset;
use crate::predicate::{Mask, PredicateError, PredicateEvaluator};

use super::errors::{SegmentError, SegmentResult};
use super::registry::SegmentRegistry;
use super::spec::{complement_id, COMPLEMENT_PREFIX};

/// Published masks and base sizes of one materialization
#[derive(Debug, Clone, Default)]
pub struct MaterializedSegments {
    masks: BTreeMap<String, Mask>,
    base_sizes: BTreeMap<String, usize>,
    failures: BTreeMap<String, PredicateError>,
}

impl MaterializedSegments {
    fn build(registry: &SegmentRegistry, dataset: &Dataset, catalog: &QuestionCatalog) -> Self {
        let evaluator = PredicateEvaluator::new(dataset, catalog);
        let mut out = Self::default();

        for spec in registry.iter() {
            match evaluator.evaluate(&spec.definition) {
                Ok(mask) => {
                    let complement = mask.complement();
                    let not_id = complement_id(&spec.segment_id);
                    out.base_sizes.insert(spec.segment_id.clone(), mask.count());
                    out.base_sizes.insert(not_id.clone(), complement.count());
                    out.masks.insert(spec.segment_id.clone(), mask);
                    out.masks.insert(not_id, complement);
                }
                Err(e) => {
                    out.failures.insert(spec.segment_id.clone(), e);
                }
            }
        }
        out
    }

    /// Mask of a segment or complement id over the full dataset
    pub fn mask(&self, id: &str) -> SegmentResult<&Mask> {
        if let Some(mask) = self.masks.get(id) {
            return Ok(mask);
        }
        let base = id.strip_prefix(COMPLEMENT_PREFIX);
        let failure = self
            .failures
            .get_key_value(id)
            .or_else(|| base.and_then(|b| self.failures.get_key_value(b)));
        match failure {
            Some((segment_id, source)) => Err(SegmentError::Materialize {
                segment_id: segment_id.clone(),
                source: source.clone(),
            }),
            None => Err(SegmentError::NotFound(id.to_string())),
        }
    }

    /// Returns true if `id` names a published segment or complement
    pub fn contains(&self, id: &str) -> bool {
        self.masks.contains_key(id)
    }

    /// Base size of every published segment and complement
    pub fn base_sizes(&self) -> &BTreeMap<String, usize> {
        &self.base_sizes
    }

    /// Segments whose definitions failed to evaluate
    pub fn failures(&self) -> &BTreeMap<String, PredicateError> {
        &self.failures
    }
}

/// Lazily materialized segment masks
#[derive(Debug, Default)]
pub struct SegmentCache {
    state: OnceLock<MaterializedSegments>,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_materialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Returns the cached masks, materializing them on first use
    pub fn get_or_materialize(
        &self,
        registry: &SegmentRegistry,
        dataset: &Dataset,
        catalog: &QuestionCatalog,
    ) -> &MaterializedSegments {
        self.state
            .get_or_init(|| MaterializedSegments::build(registry, dataset, catalog))
    }

    /// Drops cached masks; the next lookup materializes again
    pub fn reset(&mut self) {
        self.state.take();
    }
}
