//! Segment Invariant Tests
//!
//! - A segment and its complement partition the full dataset
//! - Materialization happens once and is reused across cuts
//! - Re-registering a segment invalidates cached masks
//! - One broken segment does not prevent the others from materializing

use serde_json::{json, Value};
use surveycut::catalog::{Question, QuestionCatalog, QuestionType};
use surveycut::dataset::Dataset;
use surveycut::executor::{BaseSizeThresholds, CutSpec, DimensionSpec, Executor};
use surveycut::metrics::{MetricSpec, MetricType};
use surveycut::predicate::FilterExpr;
use surveycut::segments::{SegmentCache, SegmentRegistry, SegmentSpec};

// =============================================================================
// Helper Functions
// =============================================================================

const ROWS: usize = 40;

fn region(i: usize) -> Value {
    match i % 4 {
        0 => json!("N"),
        1 => json!("S"),
        2 => json!("E"),
        _ => Value::Null,
    }
}

fn dataset() -> Dataset {
    let regions = (0..ROWS).map(region).collect();
    let ages = (0..ROWS).map(|i| json!(18 + i)).collect();
    let nps = (0..ROWS).map(|i| json!(i % 11)).collect();
    let channels = (0..ROWS)
        .map(|i| match i % 3 {
            0 => json!(["web", "app"]),
            1 => json!(["store"]),
            _ => json!([]),
        })
        .collect();

    Dataset::from_columns(vec![
        ("Q_REGION".into(), regions),
        ("age_years".into(), ages),
        ("Q_NPS".into(), nps),
        ("Q_CHANNEL".into(), channels),
    ])
    .unwrap()
}

fn catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        Question::new("Q_REGION", "Region", QuestionType::SingleChoice),
        Question::new("Q_AGE", "Age", QuestionType::Numeric).with_column("age_years"),
        Question::new("Q_NPS", "Recommend", QuestionType::Nps0To10),
        Question::new("Q_CHANNEL", "Channels", QuestionType::MultiChoice),
        Question::new("Q_INCOME", "Income", QuestionType::Numeric),
    ])
    .unwrap()
}

fn segments() -> Vec<SegmentSpec> {
    vec![
        SegmentSpec::new("north", "North", FilterExpr::eq("Q_REGION", json!("N"))),
        SegmentSpec::new("young", "Under 35", FilterExpr::range("Q_AGE", None, Some(34.0))),
        SegmentSpec::new(
            "digital",
            "Digital shoppers",
            FilterExpr::contains_any("Q_CHANNEL", vec![json!("web"), json!("app")]),
        ),
        SegmentSpec::new(
            "north_or_young_not_digital",
            "Mixed",
            FilterExpr::and(vec![
                FilterExpr::or(vec![
                    FilterExpr::eq("Q_REGION", json!("N")),
                    FilterExpr::range("Q_AGE", None, Some(34.0)),
                ]),
                FilterExpr::negate(FilterExpr::contains_any("Q_CHANNEL", vec![json!("web")])),
            ]),
        ),
    ]
}

fn executor() -> Executor {
    Executor::new(dataset(), catalog(), BaseSizeThresholds::default())
        .with_segments(SegmentRegistry::from_specs(segments()).unwrap())
}

// =============================================================================
// Partition Tests
// =============================================================================

/// count(S) + count(not_S) == total rows, for every segment.
#[test]
fn test_segment_and_complement_partition_dataset() {
    let exec = executor();
    let sizes = exec.materialize_segments();

    for spec in segments() {
        let id = spec.segment_id;
        let complement = format!("not_{}", id);
        assert_eq!(sizes[&id] + sizes[&complement], ROWS, "segment {}", id);
    }
    assert_eq!(sizes.len(), 8);
}

/// Rows with a missing value fall into the complement, never the segment.
#[test]
fn test_missing_values_land_in_complement() {
    let exec = executor();
    let sizes = exec.materialize_segments();

    assert_eq!(sizes["north"], 10);
    assert_eq!(sizes["not_north"], 30);
    assert_eq!(sizes["young"], 17);
    assert_eq!(sizes["digital"], 14);
}

/// Complement masks are the exact negation of the segment mask.
#[test]
fn test_complement_mask_is_negation() {
    let exec = executor();
    let materialized = exec.materialized();

    let inside = materialized.mask("digital").unwrap();
    let outside = materialized.mask("not_digital").unwrap();
    for row in 0..ROWS {
        assert_ne!(inside.get(row), outside.get(row), "row {}", row);
    }
}

// =============================================================================
// Caching Tests
// =============================================================================

/// Repeated materialization returns the same sizes.
#[test]
fn test_materialization_is_idempotent() {
    let exec = executor();
    let first = exec.materialize_segments().clone();
    let second = exec.materialize_segments().clone();
    assert_eq!(first, second);

    let fresh = executor();
    assert_eq!(fresh.materialize_segments(), &first);
}

/// The cache stays empty until a segment is needed.
#[test]
fn test_materialization_is_lazy() {
    let registry = SegmentRegistry::from_specs(segments()).unwrap();
    let (data, questions) = (dataset(), catalog());

    let cache = SegmentCache::new();
    assert!(!cache.is_materialized());

    let first = cache.get_or_materialize(&registry, &data, &questions).base_sizes().clone();
    assert!(cache.is_materialized());
    let again = cache.get_or_materialize(&registry, &data, &questions).base_sizes();
    assert_eq!(&first, again);
}

/// A batch without segment references reports no segment sizes.
#[test]
fn test_batch_without_segments_skips_materialization() {
    let exec = executor();
    let result = exec.execute_cuts(&[CutSpec::new("nps", MetricSpec::new(MetricType::Nps, "Q_NPS"))]);
    assert!(result.is_clean());
    assert!(result.segments_computed.is_empty());
}

/// A segment dimension fills `segments_computed` for the whole registry.
#[test]
fn test_batch_with_segment_reports_sizes() {
    let exec = executor();
    let cut = CutSpec::new("nps_north", MetricSpec::new(MetricType::Nps, "Q_NPS"))
        .with_dimension(DimensionSpec::segment("north"));

    let result = exec.execute_cuts(&[cut]);
    assert!(result.is_clean());
    assert_eq!(result.segments_computed.len(), 8);
    assert_eq!(result.segments_computed["north"], 10);
}

/// Replacing a definition drops the cached masks.
#[test]
fn test_replacement_invalidates_cache() {
    let mut exec = executor();
    assert_eq!(exec.materialize_segments()["north"], 10);

    let replaced = exec
        .register_segment(SegmentSpec::new(
            "north",
            "North or South",
            FilterExpr::in_list("Q_REGION", vec![json!("N"), json!("S")]),
        ))
        .unwrap();
    assert!(replaced.is_some());

    let sizes = exec.materialize_segments();
    assert_eq!(sizes["north"], 20);
    assert_eq!(sizes["north"] + sizes["not_north"], ROWS);
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

/// A segment over an absent column fails alone.
#[test]
fn test_broken_segment_is_isolated() {
    let mut exec = executor();
    exec.register_segment(SegmentSpec::new(
        "rich",
        "High income",
        FilterExpr::range("Q_INCOME", Some(100000.0), None),
    ))
    .unwrap();

    let materialized = exec.materialized();
    assert!(materialized.failures().contains_key("rich"));
    assert!(materialized.mask("rich").is_err());
    assert!(materialized.mask("not_rich").is_err());
    assert_eq!(materialized.base_sizes()["north"], 10);
    assert!(!materialized.base_sizes().contains_key("rich"));
}

/// A complement id cannot be registered as a segment of its own.
#[test]
fn test_complement_ids_are_reserved() {
    let mut exec = executor();
    let result = exec.register_segment(SegmentSpec::new(
        "not_north",
        "Shadow",
        FilterExpr::eq("Q_REGION", json!("S")),
    ));
    assert!(result.is_err());
    assert_eq!(exec.segments().len(), 4);
}
