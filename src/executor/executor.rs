//! Cut executor
//!
//! Executes cut batches against a session's dataset, producing deterministic
//! tables.
//!
//! Execution flow per cut (strict order):
//! 1. Resolve the base filter (segment id, raw expression or filter tree)
//! 2. Resolve the metric question and its column
//! 3. Prepare the metric calculator
//! 4. Group the base by the first dimension, if any
//! 5. Compute the metric per group, degrading failed groups to null
//! 6. Attach base-size warnings and assemble the table

use std::collections::BTreeMap;

use serde_json::Value;

use crate::catalog::{Question, QuestionCatalog};
use crate::dataset::cell::is_missing;
use crate::dataset::{Column, Dataset};
use crate::metrics::{Calculator, MetricOutput};
use crate::observability::{Event, Logger};
use crate::predicate::{Mask, PredicateEvaluator, RawFilter};
use crate::segments::{
    MaterializedSegments, SegmentCache, SegmentRegistry, SegmentResult, SegmentSpec,
    COMPLEMENT_PREFIX,
};

use super::cut::{CutFilter, CutSpec, DimensionKind, DimensionSpec};
use super::diagnostics::BaseSizeThresholds;
use super::errors::{ExecutorError, ExecutorResult};
use super::grouping::{question_groups, segment_groups, Group};
use super::result::{CrossTab, CutError, ExecutionResult, ResultData, TableResult, TableRow};

/// Metric result of one group
#[derive(Debug)]
enum GroupOutcome {
    /// No rows in the group
    Empty,
    Computed(MetricOutput),
    /// Computation failed; the group reports null
    Degraded { base_n: usize, error: ExecutorError },
}

impl GroupOutcome {
    fn base_n(&self) -> usize {
        match self {
            GroupOutcome::Empty => 0,
            GroupOutcome::Computed(out) => out.base_n,
            GroupOutcome::Degraded { base_n, .. } => *base_n,
        }
    }
}

/// Session-scoped executor.
///
/// Owns the read-only dataset and catalog, the segment registry and the
/// segment cache. All thresholds are passed in at construction.
#[derive(Debug)]
pub struct Executor {
    dataset: Dataset,
    catalog: QuestionCatalog,
    registry: SegmentRegistry,
    cache: SegmentCache,
    thresholds: BaseSizeThresholds,
}

impl Executor {
    /// Creates an executor with an empty segment registry
    pub fn new(dataset: Dataset, catalog: QuestionCatalog, thresholds: BaseSizeThresholds) -> Self {
        Self {
            dataset,
            catalog,
            registry: SegmentRegistry::new(),
            cache: SegmentCache::new(),
            thresholds,
        }
    }

    /// Replaces the segment registry
    pub fn with_segments(mut self, registry: SegmentRegistry) -> Self {
        self.registry = registry;
        self.cache.reset();
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn segments(&self) -> &SegmentRegistry {
        &self.registry
    }

    pub fn thresholds(&self) -> BaseSizeThresholds {
        self.thresholds
    }

    /// Inserts or replaces a segment and drops cached masks.
    ///
    /// Returns the definition that was replaced, if any.
    pub fn register_segment(&mut self, spec: SegmentSpec) -> SegmentResult<Option<SegmentSpec>> {
        let segment_id = spec.segment_id.clone();
        let replaced = self.registry.insert(spec)?;
        self.cache.reset();
        Logger::event(
            Event::SegmentRegistered,
            &[
                ("segment_id", &segment_id),
                ("replaced", if replaced.is_some() { "true" } else { "false" }),
            ],
        );
        Ok(replaced)
    }

    /// Materializes all registered segments, once.
    ///
    /// Returns the base size of every segment and its complement.
    pub fn materialize_segments(&self) -> &BTreeMap<String, usize> {
        self.materialized().base_sizes()
    }

    /// Masks, base sizes and per-segment failures, materialized on first call
    pub fn materialized(&self) -> &MaterializedSegments {
        let fresh = !self.cache.is_materialized();
        let segs = self
            .cache
            .get_or_materialize(&self.registry, &self.dataset, &self.catalog);
        if fresh {
            Logger::event(
                Event::SegmentsMaterialized,
                &[
                    ("segments", &self.registry.len().to_string()),
                    ("failed", &segs.failures().len().to_string()),
                ],
            );
            for (segment_id, err) in segs.failures() {
                Logger::event(
                    Event::SegmentRejected,
                    &[("segment_id", segment_id), ("message", &err.to_string())],
                );
            }
        }
        segs
    }

    /// Executes a batch of cuts.
    ///
    /// Each cut runs independently; a failing cut is recorded in `errors`
    /// and the batch continues.
    pub fn execute_cuts(&self, cuts: &[CutSpec]) -> ExecutionResult {
        Logger::event(Event::BatchStart, &[("cuts", &cuts.len().to_string())]);
        let mut result = ExecutionResult::default();
        for cut in cuts {
            self.record(&mut result, &cut.cut_id, self.execute_cut(cut));
        }
        self.finish(result)
    }

    /// Executes a batch of undecoded cuts.
    ///
    /// A cut that fails to decode becomes a configuration error record.
    pub fn execute_values(&self, cuts: &[Value]) -> ExecutionResult {
        Logger::event(Event::BatchStart, &[("cuts", &cuts.len().to_string())]);
        let mut result = ExecutionResult::default();
        for (index, value) in cuts.iter().enumerate() {
            match CutSpec::decode(value, index) {
                Ok(cut) => self.record(&mut result, &cut.cut_id, self.execute_cut(&cut)),
                Err((cut_id, err)) => self.record(&mut result, &cut_id, Err(err)),
            }
        }
        self.finish(result)
    }

    fn record(&self, result: &mut ExecutionResult, cut_id: &str, outcome: ExecutorResult<TableResult>) {
        match outcome {
            Ok(table) => {
                Logger::event(
                    Event::CutComplete,
                    &[
                        ("cut_id", cut_id),
                        ("base_n", &table.base_n.to_string()),
                        ("warnings", &table.warnings.len().to_string()),
                    ],
                );
                result.tables.push(table);
            }
            Err(err) => {
                Logger::event(
                    Event::CutFailed,
                    &[
                        ("cut_id", cut_id),
                        ("code", err.kind().code()),
                        ("message", err.message()),
                    ],
                );
                result.errors.push(CutError {
                    cut_id: cut_id.to_string(),
                    kind: err.kind(),
                    message: err.message().to_string(),
                });
            }
        }
    }

    fn finish(&self, mut result: ExecutionResult) -> ExecutionResult {
        if self.cache.is_materialized() {
            result.segments_computed = self.materialize_segments().clone();
        }
        Logger::event(
            Event::BatchComplete,
            &[
                ("tables", &result.tables.len().to_string()),
                ("errors", &result.errors.len().to_string()),
            ],
        );
        result
    }

    /// Executes a single cut
    pub fn execute_cut(&self, cut: &CutSpec) -> ExecutorResult<TableResult> {
        let base = self.resolve_base(cut.filter.as_ref())?;

        let question = self.question(&cut.metric.question_id, "metric")?;
        let column = self.column(question)?;
        let calculator = Calculator::prepare(&cut.metric, question)?;

        match cut.dimensions.split_first() {
            None => Ok(self.flat_table(cut, &calculator, column, &base)),
            Some((dimension, ignored)) => {
                self.cross_tab(cut, &calculator, column, &base, dimension, ignored)
            }
        }
    }

    /// Resolves a cut filter to a mask over the full dataset
    fn resolve_base(&self, filter: Option<&CutFilter>) -> ExecutorResult<Mask> {
        let rows = self.dataset.row_count();
        let mask = match filter {
            None => return Ok(Mask::all(rows)),
            Some(CutFilter::Named(name)) if self.is_segment_id(name) => {
                self.segment_mask(name)?.clone()
            }
            Some(CutFilter::Named(text)) => {
                RawFilter::parse(text)?.evaluate(&self.dataset, &self.catalog)?
            }
            Some(CutFilter::Expr(expr)) => {
                PredicateEvaluator::new(&self.dataset, &self.catalog).evaluate(expr)?
            }
        };
        Ok(Mask::all(rows).and(&mask))
    }

    /// Returns true if `id` names a registered segment or its complement
    fn is_segment_id(&self, id: &str) -> bool {
        self.registry.contains(id)
            || id
                .strip_prefix(COMPLEMENT_PREFIX)
                .map_or(false, |base| self.registry.contains(base))
    }

    fn segment_mask(&self, id: &str) -> ExecutorResult<&Mask> {
        Ok(self.materialized().mask(id)?)
    }

    fn question(&self, question_id: &str, role: &str) -> ExecutorResult<&Question> {
        self.catalog.get(question_id).ok_or_else(|| {
            ExecutorError::configuration(format!("Unknown {} question id: {}", role, question_id))
        })
    }

    fn column(&self, question: &Question) -> ExecutorResult<&Column> {
        let name = question.effective_column_name();
        self.dataset.column(name).ok_or_else(|| {
            ExecutorError::data(format!(
                "Column '{}' for question '{}' not found in dataset",
                name, question.question_id
            ))
        })
    }

    /// Computes the metric over the rows of `mask`
    fn compute_group(&self, calculator: &Calculator, column: &Column, mask: &Mask) -> GroupOutcome {
        let cells: Vec<&Value> = mask.rows().filter_map(|i| column.get(i)).collect();
        match calculator.compute(&cells) {
            Ok(output) => GroupOutcome::Computed(output),
            Err(err) => GroupOutcome::Degraded {
                base_n: cells.iter().filter(|c| !is_missing(c)).count(),
                error: err.into(),
            },
        }
    }

    fn flat_table(
        &self,
        cut: &CutSpec,
        calculator: &Calculator,
        column: &Column,
        base: &Mask,
    ) -> TableResult {
        let outcome = self.compute_group(calculator, column, base);
        let base_n = outcome.base_n();
        let mut warnings = self.thresholds.warnings(base_n);

        let value = match outcome {
            GroupOutcome::Computed(output) => Some(output.value),
            GroupOutcome::Degraded { error, .. } => {
                self.log_degraded(&cut.cut_id, "all", &error);
                warnings.push(format!("Metric computation failed: {}", error.message()));
                None
            }
            GroupOutcome::Empty => None,
        };

        let rows = vec![TableRow {
            dimension: None,
            value: None,
            metric: value.as_ref().map(|v| v.headline()).unwrap_or(Value::Null),
            base_n,
        }];

        TableResult {
            cut_id: cut.cut_id.clone(),
            metric_type: cut.metric.metric_type.clone(),
            question_id: cut.metric.question_id.clone(),
            result_data: ResultData::Flat(value),
            base_n,
            dimensions: Vec::new(),
            warnings,
            rows,
        }
    }

    fn cross_tab(
        &self,
        cut: &CutSpec,
        calculator: &Calculator,
        column: &Column,
        base: &Mask,
        dimension: &DimensionSpec,
        ignored: &[DimensionSpec],
    ) -> ExecutorResult<TableResult> {
        let mut warnings = Vec::new();
        if !ignored.is_empty() {
            let ids: Vec<&str> = ignored.iter().map(|d| d.id.as_str()).collect();
            warnings.push(format!(
                "Multi-dimension cross-tabs not supported; using first dimension only. Ignored: {}",
                ids.join(", ")
            ));
        }

        let groups = self.groups(base, dimension)?;

        let mut labels = Vec::with_capacity(groups.len());
        let mut by_dimension = BTreeMap::new();
        let mut base_sizes = BTreeMap::new();
        let mut rows = Vec::with_capacity(groups.len());

        for Group { label, mask } in groups {
            let outcome = if mask.count() == 0 {
                GroupOutcome::Empty
            } else {
                self.compute_group(calculator, column, &mask)
            };
            let base_n = outcome.base_n();

            let value = match outcome {
                GroupOutcome::Empty => None,
                GroupOutcome::Computed(output) => {
                    warnings.extend(
                        self.thresholds
                            .warnings(base_n)
                            .into_iter()
                            .map(|w| format!("[{}] {}", label, w)),
                    );
                    Some(output.value)
                }
                GroupOutcome::Degraded { error, .. } => {
                    self.log_degraded(&cut.cut_id, &label, &error);
                    warnings.push(format!(
                        "[{}] Metric computation failed: {}",
                        label,
                        error.message()
                    ));
                    None
                }
            };

            rows.push(TableRow {
                dimension: Some(dimension.id.clone()),
                value: Some(label.clone()),
                metric: value.as_ref().map(|v| v.headline()).unwrap_or(Value::Null),
                base_n,
            });
            base_sizes.insert(label.clone(), base_n);
            by_dimension.insert(label.clone(), value);
            labels.push(label);
        }

        let total_base: usize = base_sizes.values().sum();

        Ok(TableResult {
            cut_id: cut.cut_id.clone(),
            metric_type: cut.metric.metric_type.clone(),
            question_id: cut.metric.question_id.clone(),
            result_data: ResultData::CrossTab(CrossTab {
                dimension: dimension.id.clone(),
                groups: labels,
                by_dimension,
                base_sizes,
            }),
            base_n: total_base,
            dimensions: vec![dimension.label()],
            warnings,
            rows,
        })
    }

    /// Enumerates the groups of a dimension within `base`
    fn groups(&self, base: &Mask, dimension: &DimensionSpec) -> ExecutorResult<Vec<Group>> {
        match dimension.parse_kind()? {
            DimensionKind::Question => {
                let question = self.question(&dimension.id, "dimension")?;
                let column = self.column(question)?;
                Ok(question_groups(base, column, question))
            }
            DimensionKind::Segment => {
                if !self.is_segment_id(&dimension.id) {
                    return Err(ExecutorError::configuration(format!(
                        "Segment dimension '{}' not found",
                        dimension.id
                    )));
                }
                let segment = self.segment_mask(&dimension.id)?;
                Ok(segment_groups(base, &dimension.id, segment))
            }
        }
    }

    fn log_degraded(&self, cut_id: &str, group: &str, error: &ExecutorError) {
        Logger::event(
            Event::GroupDegraded,
            &[
                ("cut_id", cut_id),
                ("group", group),
                ("message", error.message()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnswerOption, QuestionType};
    use crate::executor::ErrorKind;
    use crate::metrics::{MetricSpec, MetricType, MetricValue};
    use crate::predicate::FilterExpr;
    use serde_json::json;

    fn executor() -> Executor {
        let dataset = Dataset::from_columns(vec![
            (
                "Q_REGION".into(),
                vec![json!("N"), json!("S"), json!("N"), json!(null), json!("S"), json!("N")],
            ),
            (
                "Q_SAT".into(),
                vec![json!(5), json!(4), json!(2), json!(5), json!(null), json!("bad")],
            ),
            (
                "Q_NPS".into(),
                vec![json!(10), json!(9), json!(3), json!(7), json!(0), json!(9)],
            ),
        ])
        .unwrap();
        let catalog = QuestionCatalog::new(vec![
            Question::new("Q_REGION", "Region", QuestionType::SingleChoice).with_options(vec![
                AnswerOption::new(json!("N"), "North"),
                AnswerOption::new(json!("S"), "South"),
                AnswerOption::new(json!("W"), "West"),
            ]),
            Question::new("Q_SAT", "Satisfaction", QuestionType::Likert1To5),
            Question::new("Q_NPS", "Recommend", QuestionType::Nps0To10),
            Question::new("Q_GONE", "Dropped", QuestionType::Numeric),
        ])
        .unwrap();
        Executor::new(dataset, catalog, BaseSizeThresholds::new(2, 3))
    }

    fn nps_cut(id: &str) -> CutSpec {
        CutSpec::new(id, MetricSpec::new(MetricType::Nps, "Q_NPS"))
    }

    #[test]
    fn test_flat_cut() {
        let table = executor().execute_cut(&nps_cut("c1")).unwrap();
        assert_eq!(table.base_n, 6);
        assert!(table.warnings.is_empty());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].dimension, None);
        // 3 promoters, 2 detractors of 6
        assert_eq!(table.rows[0].metric, json!(16.67));
    }

    #[test]
    fn test_filter_tree_narrows_base() {
        let cut = nps_cut("c1").with_filter(FilterExpr::eq("Q_REGION", json!("N")));
        let table = executor().execute_cut(&cut).unwrap();
        assert_eq!(table.base_n, 3);
        assert_eq!(table.warnings.len(), 0);
    }

    #[test]
    fn test_raw_filter() {
        let cut = nps_cut("c1").with_filter("Q_REGION == 'S'");
        let table = executor().execute_cut(&cut).unwrap();
        assert_eq!(table.base_n, 2);
        assert_eq!(table.warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_raw_filter_is_configuration_error() {
        let cut = nps_cut("c1").with_filter("Q_REGION ==");
        let err = executor().execute_cut(&cut).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().starts_with("Could not parse filter string"));
    }

    #[test]
    fn test_question_dimension_enumerates_empty_groups() {
        let cut = nps_cut("c1").with_dimension(DimensionSpec::question("Q_REGION"));
        let table = executor().execute_cut(&cut).unwrap();
        let ct = table.cross_tab().unwrap();

        assert_eq!(ct.groups, vec!["N", "S", "W"]);
        assert_eq!(ct.base_sizes["N"], 3);
        assert_eq!(ct.base_sizes["S"], 2);
        assert_eq!(ct.base_sizes["W"], 0);
        assert_eq!(ct.by_dimension["W"], None);
        // row with missing region belongs to no group
        assert_eq!(table.base_n, 5);
        assert_eq!(table.dimensions, vec!["question:Q_REGION"]);
        assert!(table.warnings.iter().any(|w| w.starts_with("[S] ")));
        assert!(!table.warnings.iter().any(|w| w.starts_with("[W] ")));
    }

    #[test]
    fn test_degraded_group_keeps_cut() {
        let cut = CutSpec::new("c1", MetricSpec::new(MetricType::Mean, "Q_SAT"))
            .with_dimension(DimensionSpec::question("Q_REGION"));
        let table = executor().execute_cut(&cut).unwrap();
        let ct = table.cross_tab().unwrap();

        assert_eq!(ct.by_dimension["N"], None);
        assert_eq!(ct.base_sizes["N"], 3);
        assert!(matches!(ct.by_dimension["S"], Some(MetricValue::Mean { .. })));
        assert!(table
            .warnings
            .iter()
            .any(|w| w.starts_with("[N] Metric computation failed")));
    }

    #[test]
    fn test_extra_dimensions_ignored_with_warning() {
        let cut = nps_cut("c1")
            .with_dimension(DimensionSpec::question("Q_REGION"))
            .with_dimension(DimensionSpec::question("Q_SAT"))
            .with_dimension(DimensionSpec::segment("vip"));
        let table = executor().execute_cut(&cut).unwrap();
        assert_eq!(table.dimensions.len(), 1);
        assert!(table.warnings[0].contains("Ignored: Q_SAT, vip"));
    }

    #[test]
    fn test_unknown_metric_type() {
        let mut cut = nps_cut("c1");
        cut.metric.metric_type = "median".into();
        let err = executor().execute_cut(&cut).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_column_is_data_error() {
        let cut = CutSpec::new("c1", MetricSpec::new(MetricType::Mean, "Q_GONE"));
        let err = executor().execute_cut(&cut).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_segment_filter_and_dimension() {
        let mut exec = executor();
        exec.register_segment(SegmentSpec::new(
            "north",
            "North",
            FilterExpr::eq("Q_REGION", json!("N")),
        ))
        .unwrap();

        let filtered = exec.execute_cut(&nps_cut("c1").with_filter("north")).unwrap();
        assert_eq!(filtered.base_n, 3);

        let complement = exec.execute_cut(&nps_cut("c2").with_filter("not_north")).unwrap();
        assert_eq!(complement.base_n, 3);

        let split = exec
            .execute_cut(&nps_cut("c3").with_dimension(DimensionSpec::segment("north")))
            .unwrap();
        let ct = split.cross_tab().unwrap();
        assert_eq!(ct.groups, vec!["north", "not_north"]);
        assert_eq!(ct.base_sizes["north"] + ct.base_sizes["not_north"], 6);
    }

    #[test]
    fn test_unknown_segment_dimension() {
        let cut = nps_cut("c1").with_dimension(DimensionSpec::segment("ghost"));
        let err = executor().execute_cut(&cut).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_register_resets_cache() {
        let mut exec = executor();
        exec.register_segment(SegmentSpec::new("s", "S", FilterExpr::eq("Q_REGION", json!("S"))))
            .unwrap();
        assert_eq!(exec.materialize_segments()["s"], 2);

        exec.register_segment(SegmentSpec::new("s", "S", FilterExpr::eq("Q_REGION", json!("N"))))
            .unwrap();
        assert_eq!(exec.materialize_segments()["s"], 3);
    }

    #[test]
    fn test_batch_reports_segments_only_when_used() {
        let mut exec = executor();
        exec.register_segment(SegmentSpec::new("s", "S", FilterExpr::eq("Q_REGION", json!("S"))))
            .unwrap();

        let result = exec.execute_cuts(&[nps_cut("c1")]);
        assert!(result.segments_computed.is_empty());

        let result = exec.execute_cuts(&[nps_cut("c2").with_filter("s")]);
        assert_eq!(result.segments_computed["s"], 2);
        assert_eq!(result.segments_computed["not_s"], 4);
    }
}
