//! Consolidated output published after every batch

use serde::Serialize;

use crate::catalog::{CatalogItem, CatalogRequest};
use crate::model::DisplayNode;
use crate::sequence::CaretPosition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    /// Flat caret offset
    pub caret: usize,
    /// Caret as (token index, inner offset) for the renderer
    pub position: CaretPosition,
    pub display: Vec<DisplayNode>,
    /// Present while the active token is in edit status
    pub autocomplete: Option<CatalogRequest>,
    /// Catalog entries matching `autocomplete`, when a catalog is attached
    pub suggestions: Vec<CatalogItem>,
}

impl ProcessResult {
    /// Concatenated display text
    pub fn text(&self) -> String {
        self.display.iter().map(|d| d.text.as_str()).collect()
    }

    /// One line per token: `text [kind/value_type] class`, active marked with `*`
    pub fn render_lines(&self) -> Vec<String> {
        self.display
            .iter()
            .map(|d| {
                format!(
                    "{}{:?} [{}/{}] {}",
                    if d.is_active { "*" } else { " " },
                    d.text,
                    d.kind,
                    d.value_type,
                    d.style_class()
                )
            })
            .collect()
    }
}
