//! Key scripts: YAML replays of keys, pastes and catalog picks
//!
//! ```yaml
//! - keys: "12+"
//! - key: "@"
//! - paste: "\"abc\""
//!   caret: 0
//! - pick: fn-datediff
//! ```
//!
//! Every step is one batch; `caret` overrides where the batch starts.

use std::path::Path;

use serde::Deserialize;

use crate::catalog::StaticCatalog;
use crate::keymap::{parse_key_pattern, KeyUsage, Keystroke, Modifiers};
use crate::processor::{EditorEvent, ProcessResult, Session};

/// One batch of a key script
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptStep {
    /// Single key pattern, e.g. "Backspace" or "ctrl+b"
    #[serde(default)]
    pub key: Option<String>,
    /// Each character typed as its own key
    #[serde(default)]
    pub keys: Option<String>,
    #[serde(default)]
    pub paste: Option<String>,
    /// Catalog identity to select
    #[serde(default)]
    pub pick: Option<String>,
    #[serde(default)]
    pub caret: Option<usize>,
}

/// Errors raised while loading or replaying a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    IoError(String),
    ParseError(String),
    InvalidStep { step: usize, message: String },
    UnknownPick { step: usize, identity: String },
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::IoError(e) => write!(f, "IO error: {}", e),
            ScriptError::ParseError(e) => write!(f, "Parse error: {}", e),
            ScriptError::InvalidStep { step, message } => {
                write!(f, "Step {}: {}", step + 1, message)
            }
            ScriptError::UnknownPick { step, identity } => {
                write!(f, "Step {}: no catalog item '{}'", step + 1, identity)
            }
        }
    }
}

impl std::error::Error for ScriptError {}

/// A parsed key script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScriptError::IoError(e.to_string()))?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> =
            serde_yaml::from_str(yaml).map_err(|e| ScriptError::ParseError(e.to_string()))?;
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replay every step against `session`, calling `on_batch` after each one
    pub fn run(
        &self,
        session: &mut Session,
        catalog: &StaticCatalog,
        mut on_batch: impl FnMut(usize, &ScriptStep, &ProcessResult),
    ) -> Result<Vec<ProcessResult>, ScriptError> {
        let mut results = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let events = step_events(index, step, catalog)?;
            let caret = step.caret.or(Some(session.processor().caret()));
            let result = session.submit(events, caret);
            on_batch(index, step, &result);
            results.push(result);
        }
        Ok(results)
    }
}

fn step_events(
    index: usize,
    step: &ScriptStep,
    catalog: &StaticCatalog,
) -> Result<Vec<EditorEvent>, ScriptError> {
    let actions = [
        step.key.is_some(),
        step.keys.is_some(),
        step.paste.is_some(),
        step.pick.is_some(),
    ];
    if actions.iter().filter(|set| **set).count() != 1 {
        return Err(ScriptError::InvalidStep {
            step: index,
            message: "expected exactly one of key, keys, paste, pick".to_string(),
        });
    }

    if let Some(pattern) = &step.key {
        let key = parse_keystroke(pattern).map_err(|message| ScriptError::InvalidStep {
            step: index,
            message,
        })?;
        return Ok(vec![EditorEvent::Key(key)]);
    }
    if let Some(text) = &step.keys {
        return Ok(text.chars().map(|c| EditorEvent::Key(Keystroke::char(c))).collect());
    }
    if let Some(text) = &step.paste {
        return Ok(vec![EditorEvent::Paste(text.clone())]);
    }
    match &step.pick {
        Some(identity) => match catalog.find(identity) {
            Some(item) => Ok(vec![EditorEvent::CatalogSelection(item.clone())]),
            None => Err(ScriptError::UnknownPick {
                step: index,
                identity: identity.clone(),
            }),
        },
        None => Ok(Vec::new()),
    }
}

/// Keystroke holding exactly the modifiers a pattern requires
pub fn parse_keystroke(pattern: &str) -> Result<Keystroke, String> {
    let pattern = parse_key_pattern(pattern).map_err(|e| e.to_string())?;
    let held = |usage: KeyUsage| usage == KeyUsage::On;
    Ok(Keystroke::new(
        pattern.key,
        Modifiers::new(
            held(pattern.ctrl),
            held(pattern.shift),
            held(pattern.alt),
            held(pattern.numlock),
        ),
    ))
}
