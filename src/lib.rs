//! Formula Editor - token-based structured expression editing
//!
//! This crate provides the engine behind a formula input box: keystrokes are
//! classified, applied to an ordered sequence of typed tokens, and the result
//! is published together with what the autocomplete list should search for.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod keymap;
pub mod model;
pub mod processor;
pub mod script;
pub mod sequence;
pub mod tracing;

// Re-export commonly used types
pub use catalog::{CatalogItem, CatalogRequest, CatalogSource, StaticCatalog};
pub use config::EngineConfig;
pub use keymap::{KeyCategory, KeyClassifier, Keystroke};
pub use model::{ExpressionNode, NodeId, NodeKind, ValueType};
pub use processor::{EditorEvent, KeyProcessor, ProcessResult, Session};
pub use sequence::Sequence;
