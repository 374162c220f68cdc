//! Default key classes
//!
//! Loaded from the embedded keyclasses.yaml, falling back to hardcoded defaults.
//! A user file at ~/.config/formula-editor/keyclasses.yaml extends them.

use super::category::KeyCategory;
use super::classifier::KeyClassifier;
use super::config::{load_key_classes_file, parse_key_classes_yaml};
use super::pattern::{KeyPattern, KeyUsage};
use super::types::KeyCode;

/// Default key classes YAML embedded at compile time
const DEFAULT_KEY_CLASSES_YAML: &str = include_str!("../../keyclasses.yaml");

/// Get the embedded default YAML, e.g. for writing a user template
pub fn get_default_key_classes_yaml() -> &'static str {
    DEFAULT_KEY_CLASSES_YAML
}

/// Load key classes: embedded defaults, then user additions
pub fn load_default_classifier() -> KeyClassifier {
    let mut classifier = match parse_key_classes_yaml(DEFAULT_KEY_CLASSES_YAML) {
        Ok(c) => {
            tracing::info!("Loaded embedded key classes ({} patterns)", c.len());
            c
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded key classes: {}, using hardcoded defaults",
                e
            );
            default_classifier()
        }
    };

    if let Some(user_path) = crate::config_paths::key_classes_file() {
        if user_path.exists() {
            match load_key_classes_file(&user_path) {
                Ok(user) => {
                    tracing::info!(
                        "Merging user key classes from {} ({} patterns)",
                        user_path.display(),
                        user.len()
                    );
                    classifier.merge(user);
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load user key classes from {}: {}",
                        user_path.display(),
                        e
                    );
                }
            }
        }
    }

    classifier
}

fn plain(key: KeyCode) -> KeyPattern {
    KeyPattern::new(key)
}

fn ctrl(c: char) -> KeyPattern {
    KeyPattern::char(c).ctrl(KeyUsage::On)
}

/// Hardcoded key classes, identical in effect to keyclasses.yaml
pub fn default_classifier() -> KeyClassifier {
    use KeyCategory::*;

    let mut patterns = vec![
        // ====================================================================
        // Denied: formatting/editor shortcuts and bare modifier or lock keys
        // ====================================================================
        (Denied, ctrl('b')),
        (Denied, ctrl('i')),
        (Denied, ctrl('u')),
        (Denied, ctrl('z')),
        (Denied, ctrl('o')),
        (Denied, ctrl('s')),
        (Denied, ctrl('x')),
        (Denied, plain(KeyCode::Control)),
        (Denied, plain(KeyCode::Alt)),
        (Denied, plain(KeyCode::Meta)),
        (Denied, plain(KeyCode::ContextMenu)),
        (Denied, plain(KeyCode::NumLock)),
        (Denied, plain(KeyCode::ScrollLock)),
        (Denied, plain(KeyCode::CapsLock)),
        (Denied, plain(KeyCode::Pause)),
        (Denied, plain(KeyCode::Insert)),
        (Denied, plain(KeyCode::Tab)),
        // ====================================================================
        // Paste
        // ====================================================================
        (Paste, ctrl('v')),
        (Paste, KeyPattern::new(KeyCode::Insert).shift(KeyUsage::On)),
        // ====================================================================
        // Movement
        // ====================================================================
        (HorizontalMove, plain(KeyCode::Left)),
        (HorizontalMove, plain(KeyCode::Right)),
        (HorizontalMove, plain(KeyCode::Home)),
        (HorizontalMove, plain(KeyCode::End)),
        (VerticalMove, plain(KeyCode::Up)),
        (VerticalMove, plain(KeyCode::Down)),
        (VerticalMove, plain(KeyCode::PageUp)),
        (VerticalMove, plain(KeyCode::PageDown)),
        // ====================================================================
        // Editing
        // ====================================================================
        (Changeless, plain(KeyCode::Shift)),
        (Remove, plain(KeyCode::Backspace)),
        (Remove, plain(KeyCode::Delete)),
        (Command, KeyPattern::char('@').ctrl(KeyUsage::Off).alt(KeyUsage::Off)),
        (Cancel, plain(KeyCode::Escape)),
        (Enter, plain(KeyCode::Enter)),
    ];

    for n in 1..=12 {
        patterns.push((Changeless, plain(KeyCode::F(n))));
    }
    // Math, brackets, comparison, delimiter
    for c in ['+', '-', '*', '/', '(', ')', '>', '<', '=', '!', ','] {
        patterns.push((SingleOperation, KeyPattern::char(c)));
    }

    KeyClassifier::with_patterns(patterns)
}
