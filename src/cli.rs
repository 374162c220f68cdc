//! Command-line argument parsing for the script runner
//!
//! Supports:
//! - Replaying a YAML key script
//! - Loading a JSON catalog for picks and suggestions
//! - An alternate engine config file
//! - Text or JSON output

use clap::Parser;
use std::path::PathBuf;

/// Replay key scripts against the formula editing engine
#[derive(Parser, Debug)]
#[command(
    name = "formula-editor",
    version,
    about = "Replay key scripts against the formula editing engine"
)]
pub struct CliArgs {
    /// Key script to replay (YAML)
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Catalog of columns, functions and settings (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Engine config instead of the one in the config directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print every published result as JSON
    #[arg(long)]
    pub json: bool,

    /// Only print the result of the last step
    #[arg(short, long)]
    pub quiet: bool,
}

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One line per token
    Text,
    Json,
}

impl CliArgs {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}
