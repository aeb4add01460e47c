//! CLI command implementations
//!
//! Every command follows the same sequence: load config, load the question
//! catalog and the response dataset, register configured segments, then do
//! its work and print one JSON envelope.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::CatalogLoader;
use crate::config::EngineConfig;
use crate::contracts::ToolOutcome;
use crate::dataset::DatasetLoader;
use crate::executor::{ExecutionResult, Executor, SegmentAdmission};
use crate::observability::{Event, Logger};
use crate::segments::SegmentSpec;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Batch document read by `execute`
#[derive(Debug, Deserialize)]
struct Batch {
    #[serde(default)]
    cuts: Vec<Value>,
    #[serde(default)]
    segments: Vec<SegmentSpec>,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
///
/// A failing command also prints the error envelope on stdout.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Execute { config } => execute(&config),
        Command::Segments { config } => segments(&config),
        Command::Check { config } => check(&config),
    };

    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Execute the batch on stdin and print the `ExecutionResult`
pub fn execute(config_path: &Path) -> CliResult<()> {
    let mut executor = load_executor(config_path)?;
    let request = read_request()?;
    let result = execute_batch(&mut executor, request)?;
    write_response(serde_json::to_value(&result)?)
}

/// Materialize configured segments and print their base sizes
pub fn segments(config_path: &Path) -> CliResult<()> {
    let executor = load_executor(config_path)?;
    write_response(segment_report(&executor))
}

/// Load every input and report counts
pub fn check(config_path: &Path) -> CliResult<()> {
    let executor = load_executor(config_path)?;
    write_response(check_report(&executor))
}

fn load_executor(config_path: &Path) -> CliResult<Executor> {
    let config = EngineConfig::load(config_path)?;
    Logger::event(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("data_dir", &config.data_dir),
        ],
    );

    let catalog = CatalogLoader::load(&config.questions_path())?;
    Logger::event(
        Event::CatalogLoaded,
        &[("questions", &catalog.len().to_string())],
    );

    let dataset = DatasetLoader::load(&config.responses_path())?;
    Logger::event(
        Event::DatasetLoaded,
        &[
            ("rows", &dataset.row_count().to_string()),
            ("columns", &dataset.column_names().count().to_string()),
        ],
    );

    let mut executor = Executor::new(dataset, catalog, config.thresholds());
    if let Some(path) = config.segments_path() {
        let specs = load_segment_file(&path)?;
        admit_all(&mut executor, specs)
            .map_err(|e| CliError::load_failed(format!("{}: {}", path.display(), e.message())))?;
    }

    Ok(executor)
}

fn load_segment_file(path: &Path) -> CliResult<Vec<SegmentSpec>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::load_failed(format!("Failed to read segments file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::load_failed(format!("Invalid segments file {}: {}", path.display(), e))
    })
}

fn admit_all(executor: &mut Executor, specs: Vec<SegmentSpec>) -> CliResult<()> {
    for spec in specs {
        if let SegmentAdmission::Rejected { errors } =
            executor.admit_segment(ToolOutcome::success(spec))
        {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(CliError::invalid_batch(messages.join("; ")));
        }
    }
    Ok(())
}

/// Registers the batch's segments, then runs its cuts.
///
/// Cuts are decoded one by one so a malformed cut becomes an error record;
/// a rejected segment fails the whole batch.
fn execute_batch(executor: &mut Executor, request: Value) -> CliResult<ExecutionResult> {
    let batch: Batch = serde_json::from_value(request)
        .map_err(|e| CliError::invalid_batch(format!("Invalid batch: {}", e)))?;

    admit_all(executor, batch.segments)?;
    Ok(executor.execute_values(&batch.cuts))
}

fn segment_report(executor: &Executor) -> Value {
    let materialized = executor.materialized();
    let failures: BTreeMap<&str, String> = materialized
        .failures()
        .iter()
        .map(|(id, err)| (id.as_str(), err.to_string()))
        .collect();

    json!({
        "total_rows": executor.dataset().row_count(),
        "base_sizes": materialized.base_sizes(),
        "failures": failures,
    })
}

fn check_report(executor: &Executor) -> Value {
    let catalog = executor.catalog();
    let dataset = executor.dataset();
    let unmatched: Vec<&str> = catalog
        .iter()
        .filter(|q| !dataset.has_column(q.effective_column_name()))
        .map(|q| q.question_id.as_str())
        .collect();

    json!({
        "questions": catalog.len(),
        "respondents": dataset.row_count(),
        "columns": dataset.column_names().count(),
        "segments": executor.segments().ids().collect::<Vec<_>>(),
        "questions_without_column": unmatched,
    })
}
