//! ExpressionNode - a single token of the structured expression

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

use super::types::{Argument, NodeId, NodeKind, ValueType};

/// Catalog-assigned and user-visible content of a token.
///
/// This is everything a rollback restores: the handle, deletion mark and edit
/// status belong to the live token, not to its content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    pub kind: NodeKind,
    pub text: String,
    pub value_type: ValueType,
    pub identity: Option<String>,
    pub code: String,
    pub schema_ref: Option<String>,
    pub reference_schema_ref: Option<String>,
    pub arguments: Vec<Argument>,
    pub chain_key: String,
}

/// A token in the expression sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionNode {
    /// Handle assigned by the owning sequence
    pub id: NodeId,
    #[serde(flatten)]
    pub content: NodeContent,
    pub marked_for_deletion: bool,
    pub edit_status: bool,
    /// Snapshot taken when edit status was entered
    #[serde(skip)]
    backup: Option<Box<NodeContent>>,
}

impl ExpressionNode {
    /// Create an empty, unclassified token
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: NodeContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    // === Accessors ===

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.content.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.content.text
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        self.content.value_type
    }

    #[inline]
    pub fn chain_key(&self) -> &str {
        &self.content.chain_key
    }

    pub fn set_chain_key(&mut self, key: impl Into<String>) {
        self.content.chain_key = key.into();
    }

    pub fn identity(&self) -> Option<&str> {
        self.content.identity.as_deref()
    }

    /// Snapshot taken when edit status was entered, if any
    pub fn backup(&self) -> Option<&NodeContent> {
        self.backup.as_deref()
    }

    /// Text length in characters
    #[inline]
    pub fn len(&self) -> usize {
        self.content.text.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.text.is_empty()
    }

    #[inline]
    pub fn is_first_caret_index(&self, inner: usize) -> bool {
        inner == 0
    }

    #[inline]
    pub fn is_last_caret_index(&self, inner: usize) -> bool {
        inner >= self.len()
    }

    /// Convert char offset to byte offset
    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.content
            .text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.content.text.len())
    }

    // === Capabilities ===

    /// Whether the text may be edited character by character
    pub fn can_key_edit(&self) -> bool {
        !self.kind().is_structural()
    }

    pub fn can_split(&self) -> bool {
        !self.kind().is_structural()
    }

    /// Whether reconciliation may reassign kind and value type
    pub fn can_change_type(&self) -> bool {
        !self.kind().is_structural() && !self.kind().is_catalog_bound() && !self.edit_status
    }

    /// Deleted in two stages: catalog-bound tokens and chain members
    pub fn needs_staged_deletion(&self, next: Option<&ExpressionNode>) -> bool {
        self.kind().is_catalog_bound() || next.is_some_and(|n| self.is_joined_with(n))
    }

    /// A lookup column can be drilled into with "."
    pub fn may_be_extended(&self) -> bool {
        self.kind() == NodeKind::Column && self.value_type() == ValueType::Lookup
    }

    /// Editable token holding a text literal
    pub fn is_editable_string(&self) -> bool {
        self.can_key_edit() && self.value_type() == ValueType::Text
    }

    pub fn is_column(&self) -> bool {
        self.kind() == NodeKind::Column
    }

    /// Both tokens belong to the same non-empty chain
    pub fn is_joined_with(&self, next: &ExpressionNode) -> bool {
        !self.content.chain_key.is_empty() && self.content.chain_key == next.content.chain_key
    }

    // === Text editing ===

    pub fn append(&mut self, text: &str) {
        self.content.text.push_str(text);
    }

    /// Insert text at a character position; positions past the end append
    pub fn insert_at(&mut self, text: &str, position: usize) {
        if position >= self.len() {
            self.append(text);
            return;
        }
        let byte = self.char_to_byte(position);
        self.content.text.insert_str(byte, text);
    }

    /// Remove the character before `position`
    pub fn remove_by_backspace(&mut self, position: usize) -> bool {
        if position == 0 || position > self.len() {
            return false;
        }
        let byte = self.char_to_byte(position - 1);
        self.content.text.remove(byte);
        true
    }

    /// Remove the character at `position`
    pub fn remove_by_delete(&mut self, position: usize) -> bool {
        if position >= self.len() {
            return false;
        }
        let byte = self.char_to_byte(position);
        self.content.text.remove(byte);
        true
    }

    /// Split at a character position strictly inside the text.
    ///
    /// The right-hand half is returned as a detached token of the same kind.
    pub fn split(&mut self, position: usize) -> Option<ExpressionNode> {
        if !self.can_split() || position == 0 || position >= self.len() {
            return None;
        }
        let byte = self.char_to_byte(position);
        let right = self.content.text.split_off(byte);
        let mut clone = ExpressionNode::new();
        clone.content.kind = self.kind();
        clone.content.value_type = self.value_type();
        clone.content.text = right;
        Some(clone)
    }

    /// Append the text of `other`; refused when either side is structural
    pub fn merge(&mut self, other: &ExpressionNode) -> bool {
        if self.kind().is_structural() || other.kind().is_structural() {
            return false;
        }
        self.content.text.push_str(other.text());
        true
    }

    // === Deletion marks ===

    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }

    pub fn unmark_for_deletion(&mut self) {
        self.marked_for_deletion = false;
    }

    // === Edit status ===

    /// Snapshot the content and turn into an empty placeholder.
    ///
    /// The chain key survives so a drill-down placeholder stays in its chain.
    pub fn enter_edit_status(&mut self) {
        self.hold_for_replacement();
        let chain_key = std::mem::take(&mut self.content.chain_key);
        self.content = NodeContent {
            chain_key,
            ..NodeContent::default()
        };
    }

    /// Snapshot the content and enter edit status without touching the text.
    ///
    /// Used by staged deletion, where the token stays visible until confirmed.
    pub fn hold_for_replacement(&mut self) {
        if !self.edit_status {
            self.backup = Some(Box::new(self.content.clone()));
        }
        self.edit_status = true;
    }

    /// Restore the snapshot, or clear to an empty placeholder without one
    pub fn rollback(&mut self) {
        let backup = self.backup.take().map(|b| *b);
        self.restore(backup);
    }

    /// Replace the content with `content`, or clear it keeping the chain key.
    ///
    /// Leaves edit status and drops any deletion mark.
    pub fn restore(&mut self, content: Option<NodeContent>) {
        match content {
            Some(content) => self.content = content,
            None => {
                let chain_key = std::mem::take(&mut self.content.chain_key);
                self.content = NodeContent {
                    chain_key,
                    ..NodeContent::default()
                };
            }
        }
        self.backup = None;
        self.edit_status = false;
        self.marked_for_deletion = false;
    }

    /// Adopt the fields of a catalog entry and leave edit status
    pub fn apply_catalog_data(&mut self, item: &CatalogItem) {
        self.content.kind = item.kind;
        self.content.text = item.title.clone();
        self.content.value_type = item.value_type;
        self.content.identity = Some(item.identity.clone());
        self.content.code = item.code.clone();
        self.content.schema_ref = item.schema_ref.clone();
        self.content.reference_schema_ref = item.reference_schema_ref.clone();
        self.content.arguments = item.arguments.clone();
        self.backup = None;
        self.edit_status = false;
        self.marked_for_deletion = false;
    }

    /// Identity this token stands for, looking through an open edit
    pub fn represented_identity(&self) -> Option<&str> {
        match (&self.backup, self.edit_status) {
            (Some(backup), true) => backup.identity.as_deref(),
            _ => self.identity(),
        }
    }
}
