//! CLI module for surveycut
//!
//! Provides command-line interface for:
//! - execute: Run a cut batch read from stdin
//! - segments: Materialize configured segments and print base sizes
//! - check: Load all inputs and report counts

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, execute, run, run_command, segments};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
