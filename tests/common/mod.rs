//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use formula_editor::catalog::{CatalogItem, StaticCatalog};
use formula_editor::config::EngineConfig;
use formula_editor::keymap::{default_classifier, KeyCode, Keystroke};
use formula_editor::model::{Argument, ExpressionNode, NodeContent, NodeKind, ValueType};
use formula_editor::processor::{KeyProcessor, ProcessResult, Session};
use formula_editor::sequence::Sequence;

/// Processor with default config and the built-in key classes
pub fn test_processor() -> KeyProcessor {
    KeyProcessor::with_classifier(EngineConfig::default(), default_classifier())
}

/// Processor over `nodes` with the caret at `caret`
pub fn test_processor_with(nodes: Vec<ExpressionNode>, caret: usize) -> KeyProcessor {
    let mut processor = test_processor().with_sequence(Sequence::from_nodes(nodes));
    processor.set_caret(caret);
    processor
}

/// Session over a fresh processor with the sample catalog attached
pub fn test_session() -> Session {
    Session::new(test_processor()).with_catalog(Box::new(test_catalog()))
}

/// Dispatch one key the way a session would, purging empties afterwards
pub fn press(processor: &mut KeyProcessor, key: KeyCode) {
    processor.dispatch(Keystroke::key(key));
    processor.sequence_mut().purge_empty();
}

pub fn type_text(processor: &mut KeyProcessor, text: &str) {
    for c in text.chars() {
        press(processor, KeyCode::Char(c));
    }
}

/// Type text through a session, one batch per character
pub fn submit_text(session: &mut Session, text: &str) -> ProcessResult {
    let mut result = session.result();
    for c in text.chars() {
        let caret = session.processor().caret();
        result = session.submit_key(Keystroke::char(c), caret);
    }
    result
}

pub fn submit_key(session: &mut Session, key: KeyCode) -> ProcessResult {
    let caret = session.processor().caret();
    session.submit_key(Keystroke::key(key), caret)
}

pub fn texts(processor: &KeyProcessor) -> Vec<String> {
    processor
        .sequence()
        .nodes()
        .iter()
        .map(|n| n.text().to_string())
        .collect()
}

pub fn result_texts(result: &ProcessResult) -> Vec<String> {
    result.display.iter().map(|d| d.text.clone()).collect()
}

pub fn constant(text: &str) -> ExpressionNode {
    ExpressionNode::with_content(NodeContent {
        kind: NodeKind::Constant,
        text: text.to_string(),
        ..NodeContent::default()
    })
}

/// Token bound to a catalog item, as a pick would leave it
pub fn bound(item: &CatalogItem) -> ExpressionNode {
    let mut node = ExpressionNode::new();
    node.apply_catalog_data(item);
    node
}

pub fn account_column() -> CatalogItem {
    CatalogItem {
        identity: "col-contact-account".to_string(),
        title: "Account".to_string(),
        code: "Account".to_string(),
        kind: NodeKind::Column,
        value_type: ValueType::Lookup,
        schema_ref: Some("Contact".to_string()),
        reference_schema_ref: Some("Account".to_string()),
        arguments: Vec::new(),
    }
}

pub fn account_name_column() -> CatalogItem {
    CatalogItem {
        identity: "col-account-name".to_string(),
        title: "Name".to_string(),
        code: "Name".to_string(),
        kind: NodeKind::Column,
        value_type: ValueType::Text,
        schema_ref: Some("Account".to_string()),
        reference_schema_ref: None,
        arguments: Vec::new(),
    }
}

pub fn datepart_function() -> CatalogItem {
    CatalogItem {
        identity: "fn-datepart".to_string(),
        title: "DATEPART".to_string(),
        code: "DATEPART".to_string(),
        kind: NodeKind::Function,
        value_type: ValueType::Integer,
        schema_ref: None,
        reference_schema_ref: None,
        arguments: vec![
            Argument::new("interval", ValueType::Text),
            Argument::new("date", ValueType::DateTime),
        ],
    }
}

pub fn currency_setting() -> CatalogItem {
    CatalogItem {
        identity: "set-currency".to_string(),
        title: "Base currency".to_string(),
        code: "BaseCurrency".to_string(),
        kind: NodeKind::SystemSetting,
        value_type: ValueType::Guid,
        schema_ref: None,
        reference_schema_ref: None,
        arguments: Vec::new(),
    }
}

pub fn test_catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        account_column(),
        account_name_column(),
        datepart_function(),
        currency_setting(),
    ])
}

/// Total text length equals the sum of token lengths and the caret is in range
pub fn assert_consistent(processor: &KeyProcessor) {
    let sequence = processor.sequence();
    let sum: usize = sequence.nodes().iter().map(|n| n.text().chars().count()).sum();
    assert_eq!(sum, sequence.total_length());
    assert!(
        processor.caret() <= sequence.total_length(),
        "caret {} past end {}",
        processor.caret(),
        sequence.total_length()
    );
}
