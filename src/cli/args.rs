//! CLI argument definitions using clap
//!
//! Commands:
//! - surveycut execute --config <path>
//! - surveycut segments --config <path>
//! - surveycut check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// surveycut - deterministic execution of survey cuts
#[derive(Parser, Debug)]
#[command(name = "surveycut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a batch of cuts read from stdin
    Execute {
        /// Path to configuration file
        #[arg(long, default_value = "./surveycut.json")]
        config: PathBuf,
    },

    /// Materialize the configured segments and print their base sizes
    Segments {
        /// Path to configuration file
        #[arg(long, default_value = "./surveycut.json")]
        config: PathBuf,
    },

    /// Load the catalog, dataset and segments and report counts
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./surveycut.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
