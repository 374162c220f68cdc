//! Keystroke classification
//!
//! This module turns raw key input into the semantic categories the
//! keystroke state machine dispatches on:
//! - Key templates constrain each modifier independently (on, off, don't care)
//! - Categories are data-driven via YAML key class files
//! - A keystroke may match several categories; dispatch order decides
//!
//! # Architecture
//!
//! ```text
//! key value + modifiers → Keystroke → KeyClassifier::is(category) → KeyProcessor rule
//! ```
//!
//! # Loading Key Classes
//!
//! ```ignore
//! // Embedded defaults merged with the user's keyclasses.yaml
//! let classifier = load_default_classifier();
//!
//! // Or from a specific file
//! let classifier = load_key_classes_file(Path::new("keyclasses.yaml"))?;
//! ```

mod category;
mod classifier;
mod config;
mod defaults;
mod pattern;
mod types;

pub use category::KeyCategory;
pub use classifier::KeyClassifier;
pub use config::{
    load_key_classes_file, parse_key_classes_yaml, parse_key_pattern, KeyClassConfig,
    KeyPatternError,
};
pub use defaults::{default_classifier, get_default_key_classes_yaml, load_default_classifier};
pub use pattern::{KeyPattern, KeyUsage};
pub use types::{KeyCode, Keystroke, Modifiers};

#[cfg(test)]
mod tests;
