//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! keystroke dispatch, caret mapping and compound edits.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=dispatch=debug,sequence=debug` - scoped filtering
//! - `RUST_LOG=formula_editor::sequence=trace` - caret mapping
//!
//! # Log Files
//!
//! Logs are written to `~/.config/formula-editor/logs/formula.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::NodeId;
use crate::sequence::Sequence;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// `~/.config/formula-editor/logs/formula.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of caret and token state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSnapshot {
    pub caret: usize,
    pub active: Option<NodeId>,
    pub texts: Vec<String>,
    pub marked: usize,
}

impl SequenceSnapshot {
    pub fn capture(sequence: &Sequence, caret: usize) -> Self {
        Self {
            caret,
            active: sequence.active(),
            texts: sequence.nodes().iter().map(|n| n.text().to_string()).collect(),
            marked: sequence.pending_deletion_ids().len(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SequenceSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.caret != other.caret {
            changes.push(format!("caret: {} → {}", self.caret, other.caret));
        }
        if self.active != other.active {
            let show = |id: Option<NodeId>| id.map_or("none".to_string(), |id| id.to_string());
            changes.push(format!(
                "active: {} → {}",
                show(self.active),
                show(other.active)
            ));
        }
        if self.texts != other.texts {
            changes.push(format!("tokens: {:?} → {:?}", self.texts, other.texts));
        }
        if self.marked != other.marked {
            changes.push(format!("marked: {} → {}", self.marked, other.marked));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
