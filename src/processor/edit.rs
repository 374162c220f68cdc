//! Text-changing operations of the key processor: delete, structural insert,
//! command placeholders, common characters and drill-down extension

use tracing::debug;

use crate::config::EditableResolution;
use crate::model::generator::DOT;
use crate::model::{ExpressionNode, NodeGenerator, NodeKind, ValueType};
use crate::sequence::literal::{is_quoted, QUOTE};

use super::extend::ExtendRequest;
use super::key_processor::KeyProcessor;

/// Caret strictly between the quotes of an editable text literal
pub(super) fn is_inside_text_literal(node: &ExpressionNode, inner: usize) -> bool {
    node.can_key_edit() && is_quoted(node.text()) && inner > 0 && inner < node.len()
}

fn is_editable(node: Option<&ExpressionNode>) -> bool {
    node.is_some_and(ExpressionNode::can_key_edit)
}

impl KeyProcessor {
    // === Delete ===

    /// Backspace (`forward == false`) or Delete at the caret
    pub(super) fn delete(&mut self, forward: bool) {
        if self
            .sequence
            .active_node()
            .is_some_and(|n| n.marked_for_deletion)
        {
            self.confirm_staged_deletion();
            return;
        }

        let Some(index) = self.deletion_target(forward) else {
            return;
        };
        if self.sequence.nodes()[index].marked_for_deletion {
            self.confirm_staged_deletion();
            return;
        }

        if self.needs_staging(index) {
            self.stage_deletion(index);
        } else {
            self.delete_char(index, forward);
        }
    }

    /// Non-empty token holding the character the key would remove
    fn deletion_target(&self, forward: bool) -> Option<usize> {
        let mut start = 0;
        for (index, node) in self.sequence.nodes().iter().enumerate() {
            let end = start + node.len();
            let hit = if forward {
                start <= self.caret && self.caret < end
            } else {
                start < self.caret && self.caret <= end
            };
            if hit && !node.is_empty() {
                return Some(index);
            }
            start = end;
        }
        None
    }

    fn needs_staging(&self, index: usize) -> bool {
        let nodes = self.sequence.nodes();
        let node = &nodes[index];
        if node.edit_status {
            return false;
        }
        let joined_prev = index > 0 && nodes[index - 1].is_joined_with(node);
        // A dangling "." at the end of a chain is plain text to delete
        node.needs_staged_deletion(nodes.get(index + 1))
            || (node.kind().is_structural() && joined_prev && node.text() != DOT)
    }

    /// Where marking starts and which token holds the pick while staged
    fn staging_plan(&self, index: usize) -> (usize, usize) {
        let nodes = self.sequence.nodes();
        let node = &nodes[index];
        let joined_prev = index > 0 && nodes[index - 1].is_joined_with(node);

        if node.kind().is_catalog_bound() {
            if joined_prev && nodes[index - 1].text() == DOT {
                return (index - 1, index);
            }
            return (index, index);
        }
        if node.text() == DOT && nodes.get(index + 1).is_some_and(|n| node.is_joined_with(n)) {
            return (index, index + 1);
        }

        // Brackets belong to the catalog token that opened their chain
        let mut head = index;
        while head > 0
            && !nodes[head].kind().is_catalog_bound()
            && nodes[head - 1].is_joined_with(&nodes[head])
        {
            head -= 1;
        }
        (head, head)
    }

    /// First stage: mark the chain and hold the token, text untouched
    fn stage_deletion(&mut self, index: usize) {
        let (mark_from, held) = self.staging_plan(index);
        self.sequence.mark_chain_from(mark_from);
        let Some(node) = self.sequence.node_mut(held) else {
            return;
        };
        node.mark_for_deletion();
        node.hold_for_replacement();
        let id = node.id;
        self.sequence.set_active(Some(id));
        debug!(
            target: "dispatch",
            marked = self.sequence.pending_deletion_ids().len(),
            "staged deletion"
        );
    }

    /// Second stage: drop every marked token and close the gap
    fn confirm_staged_deletion(&mut self) {
        let Some(first) = self.sequence.remove_marked() else {
            return;
        };
        self.sequence.clear_active();
        self.caret = self.sequence.start_of(first);
        if first > 0 {
            self.sequence.try_merge(first - 1, first);
        }
        debug!(target: "dispatch", caret = self.caret, "staged deletion confirmed");
    }

    fn delete_char(&mut self, index: usize, forward: bool) {
        let inner = self.sequence.caret_within_token(index, self.caret);
        let Some(node) = self.sequence.node_mut(index) else {
            return;
        };
        let removed = if forward {
            node.remove_by_delete(inner)
        } else {
            node.remove_by_backspace(inner)
        };
        if !removed {
            return;
        }
        if !forward {
            self.caret -= 1;
        }

        let node = &self.sequence.nodes()[index];
        if node.is_empty() && !self.sequence.is_active(node.id) {
            self.sequence.remove(index);
            if index > 0 {
                self.sequence.try_merge(index - 1, index);
            }
        }
    }

    // === Structural insert ===

    /// Put a single-character operator at the caret as its own token
    pub(super) fn insert_operator(&mut self, operation: &str) {
        self.commit_active();

        let Some((index, inner)) = self.caret_token() else {
            self.sequence.push(NodeGenerator::operator(operation));
            self.caret = operation.chars().count();
            return;
        };

        let len = self.sequence.nodes()[index].len();
        let split = if inner > 0 && inner < len {
            self.sequence.node_mut(index).and_then(|n| n.split(inner))
        } else {
            None
        };

        let slot = match split {
            Some(right) => {
                self.sequence.insert_after(index, right);
                index + 1
            }
            None => self.slot_for(index, inner),
        };
        self.sequence.insert_at(slot, NodeGenerator::operator(operation));
        self.caret = self.sequence.start_of(slot) + operation.chars().count();
        debug!(target: "dispatch", operation, slot, "operator inserted");
    }

    /// Legal insertion index for a new token next to (index, inner)
    fn slot_for(&self, index: usize, inner: usize) -> usize {
        if inner == 0 && self.sequence.can_insert_before(index) {
            index
        } else {
            self.sequence.insert_after_position(index)
        }
    }

    /// Leave edit status keeping the typed text, and drop the binding
    fn commit_active(&mut self) {
        if let Some(node) = self.sequence.active_node_mut() {
            if node.edit_status {
                let content = node.content.clone();
                node.restore(Some(content));
            }
        }
        if self.sequence.active().is_some() {
            self.sequence.clear_active();
            self.sequence.purge_empty();
        }
    }

    // === Command ===

    /// Open a catalog pick on a fresh placeholder at the caret
    pub(super) fn open_catalog_pick(&mut self) {
        if let Some((index, _)) = self.caret_token() {
            let node = &self.sequence.nodes()[index];
            if node.is_empty() && node.edit_status {
                let id = node.id;
                self.sequence.set_active(Some(id));
                self.caret = self.sequence.start_of(index);
                return;
            }
        }

        self.commit_active();
        let slot = match self.caret_token() {
            Some((index, inner)) => self.slot_for(index, inner),
            None => 0,
        };
        let id = self.sequence.insert_at(slot, NodeGenerator::placeholder());
        self.sequence.set_active(Some(id));
        self.caret = self.sequence.start_of(slot);
        debug!(target: "dispatch", slot, "catalog pick opened");
    }

    // === Common character ===

    pub(super) fn type_char(&mut self, c: char) {
        if c == QUOTE && self.skips_closing_quote() {
            self.caret += 1;
            return;
        }
        if c == ' ' && !self.caret_inside_text_literal() {
            return;
        }

        let (index, inner) = self.resolve_editable();
        if c == '.' {
            if let Some(column) = self.extendable_before(index, inner) {
                let fresh = self
                    .sequence
                    .node(index)
                    .is_some_and(|n| n.is_empty() && !self.sequence.is_active(n.id));
                if fresh {
                    self.sequence.remove(index);
                }
                self.extend(column);
                return;
            }
        }
        let Some(node) = self.sequence.node_mut(index) else {
            return;
        };

        // Typing over a bound token reopens its pick
        if node.kind().is_catalog_bound() && !node.edit_status {
            node.hold_for_replacement();
            let id = node.id;
            self.sequence.set_active(Some(id));
        }

        let Some(node) = self.sequence.node_mut(index) else {
            return;
        };
        let opens_literal = c == QUOTE
            && node.is_empty()
            && matches!(node.kind(), NodeKind::Unset | NodeKind::Constant)
            && matches!(node.value_type(), ValueType::Unset | ValueType::Text);
        if opens_literal {
            node.append("\"\"");
            self.caret = self.sequence.start_of(index) + 1;
            return;
        }

        node.insert_at(&c.to_string(), inner);
        self.caret = self.sequence.start_of(index) + inner + 1;
    }

    /// Caret sits right before the closing quote of a text literal
    fn skips_closing_quote(&self) -> bool {
        let Some((index, inner)) = self.caret_token() else {
            return false;
        };
        let node = &self.sequence.nodes()[index];
        node.can_key_edit() && is_quoted(node.text()) && inner + 1 == node.len()
    }

    /// Editable token and inner offset that should receive typed text.
    ///
    /// Creates an empty token where none is editable.
    fn resolve_editable(&mut self) -> (usize, usize) {
        let index = self.sequence.force_token_at(self.caret);
        let inner = self.sequence.caret_within_token(index, self.caret);
        let nodes = self.sequence.nodes();
        let node = &nodes[index];

        if node.can_key_edit() {
            return (index, inner);
        }

        if inner == 0 {
            if index > 0 && is_editable(nodes.get(index - 1)) {
                return (index - 1, nodes[index - 1].len());
            }
            if self.sequence.can_insert_before(index) {
                self.sequence.insert_at(index, ExpressionNode::new());
                return (index, 0);
            }
            return self.resolve_blocked(index);
        }

        if inner >= node.len() {
            if is_editable(nodes.get(index + 1)) {
                return (index + 1, 0);
            }
            if self.sequence.can_insert_after(index) {
                self.sequence.insert_after(index, ExpressionNode::new());
                return (index + 1, 0);
            }
            return self.resolve_blocked(index);
        }

        self.editable_at(self.sequence.insert_after_position(index))
    }

    /// Both sides of the caret are chain-joined and not editable
    fn resolve_blocked(&mut self, index: usize) -> (usize, usize) {
        match self.config.editable_resolution {
            EditableResolution::SkipChain => {
                self.editable_at(self.sequence.insert_after_position(index))
            }
            EditableResolution::InsertBefore => {
                let nodes = self.sequence.nodes();
                let mut head = index;
                while head > 0 && nodes[head - 1].is_joined_with(&nodes[head]) {
                    head -= 1;
                }
                if head > 0 && is_editable(nodes.get(head - 1)) {
                    return (head - 1, nodes[head - 1].len());
                }
                self.sequence.insert_at(head, ExpressionNode::new());
                (head, 0)
            }
        }
    }

    fn editable_at(&mut self, position: usize) -> (usize, usize) {
        if is_editable(self.sequence.node(position)) {
            return (position, 0);
        }
        self.sequence.insert_at(position, ExpressionNode::new());
        (position, 0)
    }

    // === Extend ===

    /// Lookup column right before the insertion point, not yet drilled into
    fn extendable_before(&self, index: usize, inner: usize) -> Option<usize> {
        if inner != 0 || index == 0 {
            return None;
        }
        let nodes = self.sequence.nodes();
        let column = &nodes[index - 1];
        let extendable = !column.is_empty()
            && column.may_be_extended()
            && !column.is_joined_with(&nodes[index]);
        extendable.then_some(index - 1)
    }

    /// Dotted path of column codes from the chain head up to `index`
    fn root_meta_path(&self, index: usize) -> String {
        let nodes = self.sequence.nodes();
        let mut head = index;
        while head > 0 && nodes[head - 1].is_joined_with(&nodes[head]) {
            head -= 1;
        }
        nodes[head..=index]
            .iter()
            .filter(|n| n.is_column())
            .map(|n| {
                if n.content.code.is_empty() {
                    n.text()
                } else {
                    n.content.code.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(DOT)
    }

    /// Drill into a lookup column: "." plus a placeholder joined to its chain
    fn extend(&mut self, column: usize) {
        self.commit_active();

        let chain_key = match self.sequence.node(column).map(|n| n.chain_key().to_string()) {
            Some(key) if !key.is_empty() => key,
            _ => self.sequence.next_chain_key(),
        };
        if let Some(node) = self.sequence.node_mut(column) {
            node.set_chain_key(chain_key.as_str());
        }

        let request = ExtendRequest {
            root_meta_path: self.root_meta_path(column),
            chain_key: chain_key.clone(),
        };
        let mut continuation = self
            .extend
            .as_ref()
            .map(|source| source.extend(&request))
            .unwrap_or_default();
        if continuation.is_empty() {
            continuation = vec![NodeGenerator::operator(DOT), NodeGenerator::placeholder()];
        }
        for node in &mut continuation {
            node.set_chain_key(chain_key.as_str());
        }

        let ids = self.sequence.insert_all_at(column + 1, continuation);
        let pick = ids
            .iter()
            .copied()
            .find(|id| self.sequence.get(*id).is_some_and(|n| n.edit_status));
        match pick.and_then(|id| self.sequence.index_of(id)) {
            Some(index) => {
                self.sequence.set_active(pick);
                self.caret = self.sequence.start_of(index);
            }
            None => {
                self.caret = self.sequence.start_of(column + 1 + ids.len());
            }
        }
        debug!(
            target: "dispatch",
            path = %request.root_meta_path,
            chain = %request.chain_key,
            "column extended"
        );
    }
}
