//! Cut Isolation Tests
//!
//! - A failing cut is recorded and the batch continues
//! - Error kinds: configuration, data, computation
//! - A failing group degrades to null without failing its cut
//! - A segment dimension always yields the segment and its complement

use serde_json::{json, Value};
use surveycut::catalog::{Question, QuestionCatalog, QuestionType};
use surveycut::dataset::Dataset;
use surveycut::executor::{
    BaseSizeThresholds, CutSpec, DimensionSpec, ErrorKind, Executor, ResultData,
};
use surveycut::metrics::{MetricSpec, MetricType};
use surveycut::predicate::FilterExpr;
use surveycut::segments::{SegmentRegistry, SegmentSpec};

// =============================================================================
// Helper Functions
// =============================================================================

/// 100 rows of wave 2024 (30 heavy users) and 20 rows of wave 2023 (all heavy)
fn executor() -> Executor {
    let rows = 120;
    let wave = (0..rows)
        .map(|i| if i < 100 { json!("2024") } else { json!("2023") })
        .collect();
    let usage = (0..rows)
        .map(|i| if i >= 100 || i % 10 < 3 { json!("heavy") } else { json!("light") })
        .collect();
    let nps = (0..rows).map(|i| json!(i % 11)).collect();
    let score = (0..rows)
        .map(|i| if i == 5 { json!("n/a") } else { json!(i % 7) })
        .collect();

    let dataset = Dataset::from_columns(vec![
        ("Q_WAVE".into(), wave),
        ("Q_USAGE".into(), usage),
        ("Q_NPS".into(), nps),
        ("Q_SCORE".into(), score),
    ])
    .unwrap();

    let catalog = QuestionCatalog::new(vec![
        Question::new("Q_WAVE", "Wave", QuestionType::SingleChoice),
        Question::new("Q_USAGE", "Usage", QuestionType::SingleChoice),
        Question::new("Q_NPS", "Recommend", QuestionType::Nps0To10),
        Question::new("Q_SCORE", "Score", QuestionType::Numeric),
        Question::new("Q_RETIRED", "Retired question", QuestionType::Numeric),
    ])
    .unwrap();

    let registry = SegmentRegistry::from_specs(vec![SegmentSpec::new(
        "heavy",
        "Heavy users",
        FilterExpr::eq("Q_USAGE", json!("heavy")),
    )])
    .unwrap();

    Executor::new(dataset, catalog, BaseSizeThresholds::new(10, 50)).with_segments(registry)
}

fn nps_cut(id: &str) -> CutSpec {
    CutSpec::new(id, MetricSpec::new(MetricType::Nps, "Q_NPS"))
}

// =============================================================================
// Segment Dimension Tests
// =============================================================================

/// Segment covering 30 of 100 filtered rows: two groups, 30 and 70.
#[test]
fn test_segment_cross_tab_partitions_filtered_base() {
    let exec = executor();
    let cut = nps_cut("nps_by_heavy")
        .with_filter("Q_WAVE == '2024'")
        .with_dimension(DimensionSpec::segment("heavy"));

    let result = exec.execute_cuts(&[cut]);
    assert!(result.is_clean());

    let table = result.table("nps_by_heavy").unwrap();
    let ct = table.cross_tab().unwrap();
    assert_eq!(ct.groups, vec!["heavy", "not_heavy"]);
    assert_eq!(ct.base_sizes["heavy"], 30);
    assert_eq!(ct.base_sizes["not_heavy"], 70);
    assert_eq!(table.base_n, 100);
    assert_eq!(table.dimensions, vec!["segment:heavy"]);
    assert_eq!(table.rows.len(), 2);

    // segment sizes are reported over the full dataset
    assert_eq!(result.segments_computed["heavy"], 50);
    assert_eq!(result.segments_computed["not_heavy"], 70);
}

/// Rows outside the filtered base never leak into either group.
#[test]
fn test_segment_groups_respect_filter() {
    let exec = executor();
    let cut = nps_cut("old_wave")
        .with_filter(FilterExpr::eq("Q_WAVE", json!("2023")))
        .with_dimension(DimensionSpec::segment("heavy"));

    let table = exec.execute_cut(&cut).unwrap();
    let ct = table.cross_tab().unwrap();
    assert_eq!(ct.base_sizes["heavy"], 20);
    assert_eq!(ct.base_sizes["not_heavy"], 0);
    assert_eq!(ct.by_dimension["not_heavy"], None);
    // an empty group carries no base-size warning
    assert!(table.warnings.iter().all(|w| !w.starts_with("[not_heavy]")));
    assert!(table.warnings.iter().any(|w| w.starts_with("[heavy] Base size 20")));
}

// =============================================================================
// Batch Isolation Tests
// =============================================================================

/// Unknown metric question: one error record, other cuts still returned.
#[test]
fn test_unknown_question_fails_only_its_cut() {
    let exec = executor();
    let cuts = vec![
        nps_cut("first"),
        CutSpec::new("ghost", MetricSpec::new(MetricType::Mean, "Q_DOES_NOT_EXIST")),
        nps_cut("last").with_filter("heavy"),
    ];

    let result = exec.execute_cuts(&cuts);
    assert_eq!(result.tables.len(), 2);
    assert_eq!(result.errors.len(), 1);

    let err = result.error("ghost").unwrap();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(err.message.contains("Q_DOES_NOT_EXIST"));
    assert!(result.table("first").is_some());
    assert_eq!(result.table("last").unwrap().base_n, 50);
}

/// A question without a dataset column is a data error.
#[test]
fn test_missing_column_is_data_error() {
    let exec = executor();
    let result = exec.execute_cuts(&[CutSpec::new(
        "retired",
        MetricSpec::new(MetricType::Mean, "Q_RETIRED"),
    )]);

    let err = result.error("retired").unwrap();
    assert_eq!(err.kind, ErrorKind::Data);
    assert!(err.message.contains("not found in dataset"));
}

/// Configuration failures of every flavour stay within their cut.
#[test]
fn test_configuration_errors_are_per_cut() {
    let exec = executor();
    let cuts = vec![
        json!({ "cut_id": "median", "metric": { "type": "median", "question_id": "Q_NPS" } }),
        json!({
            "cut_id": "bad_filter",
            "metric": { "type": "nps", "question_id": "Q_NPS" },
            "filter": "Q_WAVE === 2024"
        }),
        json!({
            "cut_id": "bad_segment",
            "metric": { "type": "nps", "question_id": "Q_NPS" },
            "dimensions": [{ "kind": "segment", "id": "casual" }]
        }),
        json!({
            "cut_id": "bad_kind",
            "metric": { "type": "nps", "question_id": "Q_NPS" },
            "dimensions": [{ "kind": "weekday", "id": "mon" }]
        }),
        json!({ "metric": "nps" }),
        json!({ "cut_id": "ok", "metric": { "type": "nps", "question_id": "Q_NPS" } }),
    ];

    let result = exec.execute_values(&cuts);
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].cut_id, "ok");

    let ids: Vec<&str> = result.errors.iter().map(|e| e.cut_id.as_str()).collect();
    assert_eq!(ids, vec!["median", "bad_filter", "bad_segment", "bad_kind", "cut_4"]);
    assert!(result.errors.iter().all(|e| e.kind == ErrorKind::Configuration));

    let bad_filter = result.error("bad_filter").unwrap();
    assert!(bad_filter.message.starts_with("Could not parse filter string"));
    assert!(result.error("cut_4").unwrap().message.starts_with("Malformed cut"));
}

/// A pathologically nested filter string is rejected, not evaluated.
#[test]
fn test_deeply_nested_filter_fails_only_its_cut() {
    let exec = executor();
    let deep = format!("{}Q_NPS == 9", "~".repeat(20_000));
    let result = exec.execute_cuts(&[nps_cut("deep").with_filter(deep.as_str()), nps_cut("plain")]);

    assert_eq!(result.tables.len(), 1);
    let err = result.error("deep").unwrap();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(err.message.contains("nested too deeply"));
    assert!(result.table("plain").is_some());
}

/// Boxes need a scale or explicit codes.
#[test]
fn test_box_without_codes_is_configuration_error() {
    let exec = executor();
    let err = exec
        .execute_cut(&CutSpec::new("box", MetricSpec::new(MetricType::Top2Box, "Q_SCORE")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

// =============================================================================
// Group Degradation Tests
// =============================================================================

/// A bad value degrades only the group holding it.
#[test]
fn test_bad_value_degrades_one_group() {
    let exec = executor();
    let cut = CutSpec::new("score_by_heavy", MetricSpec::new(MetricType::Mean, "Q_SCORE"))
        .with_dimension(DimensionSpec::segment("heavy"));

    let table = exec.execute_cut(&cut).unwrap();
    let ct = table.cross_tab().unwrap();

    // row 5 is light
    assert_eq!(ct.by_dimension["not_heavy"], None);
    assert!(ct.by_dimension["heavy"].is_some());
    assert_eq!(ct.base_sizes["heavy"], 50);
    assert!(table
        .warnings
        .iter()
        .any(|w| w.starts_with("[not_heavy] Metric computation failed")));
    assert_eq!(table.rows[1].metric, Value::Null);
}

/// Without a dimension the whole cut degrades to a null result, not an error.
#[test]
fn test_bad_value_degrades_flat_cut() {
    let exec = executor();
    let result = exec.execute_cuts(&[CutSpec::new(
        "score",
        MetricSpec::new(MetricType::Mean, "Q_SCORE"),
    )]);

    assert!(result.is_clean());
    let table = result.table("score").unwrap();
    assert_eq!(table.result_data, ResultData::Flat(None));
    assert!(table.warnings.iter().any(|w| w.starts_with("Metric computation failed")));
}

// =============================================================================
// Dimension Handling Tests
// =============================================================================

/// Only the first dimension is used; the rest are named in a warning.
#[test]
fn test_extra_dimensions_are_ignored_with_warning() {
    let exec = executor();
    let cut = nps_cut("multi")
        .with_dimension(DimensionSpec::question("Q_WAVE"))
        .with_dimension(DimensionSpec::segment("heavy"))
        .with_dimension(DimensionSpec::question("Q_USAGE"));

    let table = exec.execute_cut(&cut).unwrap();
    assert_eq!(table.dimensions, vec!["question:Q_WAVE"]);
    assert_eq!(table.cross_tab().unwrap().groups, vec!["2024", "2023"]);
    assert_eq!(
        table.warnings[0],
        "Multi-dimension cross-tabs not supported; using first dimension only. Ignored: heavy, Q_USAGE"
    );
}
