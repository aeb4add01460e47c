//! Result types for cut execution

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::metrics::MetricValue;

use super::errors::ErrorKind;

/// Per-group results of a cross-tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    /// Dimension id the groups come from
    pub dimension: String,
    /// Group labels in enumeration order
    pub groups: Vec<String>,
    /// Metric per group; `null` for empty or degraded groups
    pub by_dimension: BTreeMap<String, Option<MetricValue>>,
    pub base_sizes: BTreeMap<String, usize>,
}

/// Metric payload of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultData {
    /// One metric over the filtered base; `null` when degraded
    Flat(Option<MetricValue>),
    CrossTab(CrossTab),
}

/// Row of the denormalized tabular view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub dimension: Option<String>,
    pub value: Option<String>,
    pub metric: Value,
    pub base_n: usize,
}

/// Result of one successful cut
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableResult {
    pub cut_id: String,
    pub metric_type: String,
    pub question_id: String,
    pub result_data: ResultData,
    pub base_n: usize,
    /// Dimensions used, as `kind:id`
    pub dimensions: Vec<String>,
    pub warnings: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableResult {
    /// SHA-256 hex digest of the serialized table.
    ///
    /// Identical cuts over an unchanged dataset yield identical digests.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn is_cross_tab(&self) -> bool {
        matches!(self.result_data, ResultData::CrossTab(_))
    }

    /// Cross-tab payload, if any
    pub fn cross_tab(&self) -> Option<&CrossTab> {
        match &self.result_data {
            ResultData::CrossTab(ct) => Some(ct),
            ResultData::Flat(_) => None,
        }
    }
}

/// A failed cut
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutError {
    pub cut_id: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Aggregate result of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Successful tables in batch order
    pub tables: Vec<TableResult>,
    /// Failed cuts in batch order
    pub errors: Vec<CutError>,
    /// Base size of every segment and complement materialized
    pub segments_computed: BTreeMap<String, usize>,
}

impl ExecutionResult {
    pub fn table(&self, cut_id: &str) -> Option<&TableResult> {
        self.tables.iter().find(|t| t.cut_id == cut_id)
    }

    pub fn error(&self, cut_id: &str) -> Option<&CutError> {
        self.errors.iter().find(|e| e.cut_id == cut_id)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
