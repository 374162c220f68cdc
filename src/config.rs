//! Engine configuration persistence
//!
//! Stores engine preferences in `~/.config/formula-editor/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keymap::{load_default_classifier, parse_key_pattern, KeyCategory, KeyClassifier, KeyCode};

/// Where Cancel leaves the caret after rolling back the active token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelCaret {
    /// Just after the restored token
    #[default]
    Restore,
    /// Keep the caret, clamped to the new text length
    Clamp,
}

/// Where typed text goes when the caret touches a chain it cannot enter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableResolution {
    /// Continue after the end of the chain
    #[default]
    SkipChain,
    /// Go before the start of the chain
    InsertBefore,
}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema whose columns are offered at the root of an expression
    #[serde(default = "default_root_schema")]
    pub root_schema: String,

    /// Key that opens a catalog pick at the caret
    #[serde(default = "default_command_key")]
    pub command_key: String,

    #[serde(default)]
    pub cancel_caret: CancelCaret,

    #[serde(default)]
    pub editable_resolution: EditableResolution,

    /// Extra key patterns to swallow, e.g. "ctrl+p"
    #[serde(default)]
    pub denied_keys: Vec<String>,
}

fn default_root_schema() -> String {
    "Contact".to_string()
}

fn default_command_key() -> String {
    "@".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_schema: default_root_schema(),
            command_key: default_command_key(),
            cancel_caret: CancelCaret::default(),
            editable_resolution: EditableResolution::default(),
            denied_keys: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on error
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default key classes with this config's command key and denied keys applied
    pub fn classifier(&self) -> KeyClassifier {
        let mut classifier = load_default_classifier();
        self.apply_to(&mut classifier);
        classifier
    }

    /// Apply the command key and denied keys; invalid entries are logged and skipped
    pub fn apply_to(&self, classifier: &mut KeyClassifier) {
        match self.command_key.parse::<KeyCode>() {
            Ok(key) => classifier.set_command_key(key),
            Err(e) => tracing::warn!("Ignoring command key {:?}: {}", self.command_key, e),
        }

        for entry in &self.denied_keys {
            match parse_key_pattern(entry) {
                Ok(pattern) => classifier.add(KeyCategory::Denied, pattern),
                Err(e) => tracing::warn!("Ignoring denied key {:?}: {}", entry, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{default_classifier, Keystroke, Modifiers};

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.command_key, "@");
        assert_eq!(config.cancel_caret, CancelCaret::Restore);
        assert_eq!(config.editable_resolution, EditableResolution::SkipChain);
    }

    #[test]
    fn test_policies_parse_snake_case() {
        let yaml = "cancel_caret: clamp\neditable_resolution: insert_before\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.cancel_caret, CancelCaret::Clamp);
        assert_eq!(config.editable_resolution, EditableResolution::InsertBefore);
    }

    #[test]
    fn test_apply_to_sets_command_key() {
        let config = EngineConfig {
            command_key: "#".to_string(),
            ..EngineConfig::default()
        };
        let mut classifier = default_classifier();
        config.apply_to(&mut classifier);
        assert!(classifier.is_command(&Keystroke::char('#')));
        assert!(!classifier.is_command(&Keystroke::char('@')));
    }

    #[test]
    fn test_apply_to_skips_invalid_denied_keys() {
        let config = EngineConfig {
            denied_keys: vec!["ctrl+p".to_string(), "hyper+q".to_string()],
            ..EngineConfig::default()
        };
        let mut classifier = default_classifier();
        let before = classifier.len();
        config.apply_to(&mut classifier);
        assert_eq!(classifier.len(), before + 1);
        assert!(classifier.is(
            KeyCategory::Denied,
            &Keystroke::new(KeyCode::Char('p'), Modifiers::CTRL)
        ));
    }
}
