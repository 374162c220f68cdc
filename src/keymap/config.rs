//! YAML configuration parsing for key classes
//!
//! Parses keyclasses.yaml files into a KeyClassifier.

use std::collections::BTreeMap;
use std::path::Path;

use super::category::KeyCategory;
use super::classifier::KeyClassifier;
use super::pattern::{KeyPattern, KeyUsage};
use super::types::KeyCode;

/// Root structure of a key classes YAML file: category name to pattern strings
pub type KeyClassConfig = BTreeMap<KeyCategory, Vec<String>>;

/// Load key classes from a YAML file
pub fn load_key_classes_file(path: &Path) -> Result<KeyClassifier, KeyPatternError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| KeyPatternError::IoError(e.to_string()))?;

    parse_key_classes_yaml(&content)
}

/// Parse key classes from YAML string
pub fn parse_key_classes_yaml(yaml: &str) -> Result<KeyClassifier, KeyPatternError> {
    let config: KeyClassConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeyPatternError::ParseError(e.to_string()))?;

    let mut classifier = KeyClassifier::new();
    for (category, entries) in config {
        for entry in entries {
            classifier.add(category, parse_key_pattern(&entry)?);
        }
    }
    Ok(classifier)
}

/// Parse a pattern string like "ctrl+b", "!ctrl+!alt+@" or "shift+Insert".
///
/// A bare modifier name requires the modifier, a `!` prefix forbids it and
/// unnamed modifiers are ignored. The key comes last; `+` itself is written
/// as "+" or "ctrl++".
pub fn parse_key_pattern(pattern: &str) -> Result<KeyPattern, KeyPatternError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(KeyPatternError::InvalidKey("empty pattern".to_string()));
    }

    let (modifier_part, key_part) = if pattern == "+" {
        ("", "+")
    } else if let Some(prefix) = pattern.strip_suffix("++") {
        (prefix, "+")
    } else {
        match pattern.rsplit_once('+') {
            Some((prefix, key)) => (prefix, key),
            None => ("", pattern),
        }
    };

    if key_part.is_empty() {
        return Err(KeyPatternError::InvalidKey(format!(
            "No key found in pattern: {}",
            pattern
        )));
    }

    let key = key_part
        .parse::<KeyCode>()
        .map_err(KeyPatternError::InvalidKey)?;
    let mut result = KeyPattern::new(key);

    for part in modifier_part.split('+').filter(|p| !p.is_empty()) {
        let (usage, name) = match part.strip_prefix('!') {
            Some(name) => (KeyUsage::Off, name),
            None => (KeyUsage::On, part),
        };
        result = match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => result.ctrl(usage),
            "alt" | "option" | "opt" => result.alt(usage),
            "shift" => result.shift(usage),
            "numlock" => result.numlock(usage),
            _ => return Err(KeyPatternError::InvalidModifier(part.to_string())),
        };
    }

    Ok(result)
}

/// Errors that can occur when parsing key classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPatternError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidModifier(String),
}

impl std::fmt::Display for KeyPatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPatternError::IoError(e) => write!(f, "IO error: {}", e),
            KeyPatternError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeyPatternError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeyPatternError::InvalidModifier(m) => write!(f, "Invalid modifier: {}", m),
        }
    }
}

impl std::error::Error for KeyPatternError {}
