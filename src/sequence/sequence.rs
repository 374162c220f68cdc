//! Sequence - the ordered token list and its position arithmetic

use serde::Serialize;

use crate::model::{DisplayNode, ExpressionNode, NodeId, NodeKind};

use super::caret::CaretPosition;
use super::literal::classify_literal;

/// Ordered tokens plus the handle of the token bound to a catalog pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    nodes: Vec<ExpressionNode>,
    active: Option<NodeId>,
    next_id: u64,
    next_chain: u64,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    active: Option<NodeId>,
    nodes: &'a [ExpressionNode],
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            active: None,
            next_id: 1,
            next_chain: 1,
        }
    }

    /// Build a sequence from detached tokens, assigning handles in order
    pub fn from_nodes(nodes: impl IntoIterator<Item = ExpressionNode>) -> Self {
        let mut sequence = Self::new();
        for node in nodes {
            sequence.push(node);
        }
        sequence
    }

    // === Access ===

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ExpressionNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&ExpressionNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut ExpressionNode> {
        self.nodes.get_mut(index)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn get(&self, id: NodeId) -> Option<&ExpressionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ExpressionNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Concatenated text of all tokens
    pub fn text(&self) -> String {
        self.nodes.iter().map(|n| n.text()).collect()
    }

    // === Active token ===

    #[inline]
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Bind a token to the catalog pick; unknown handles clear the binding
    pub fn set_active(&mut self, id: Option<NodeId>) {
        self.active = id.filter(|&id| self.index_of(id).is_some());
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.active == Some(id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    pub fn active_node(&self) -> Option<&ExpressionNode> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_node_mut(&mut self) -> Option<&mut ExpressionNode> {
        let id = self.active?;
        self.get_mut(id)
    }

    /// Fresh chain key, unique within this sequence
    pub fn next_chain_key(&mut self) -> String {
        let key = format!("chain-{}", self.next_chain);
        self.next_chain += 1;
        key
    }

    // === Position arithmetic ===

    /// Sum of all token lengths
    pub fn total_length(&self) -> usize {
        self.nodes.iter().map(ExpressionNode::len).sum()
    }

    /// Caret offset of the first character of a token
    pub fn start_of(&self, index: usize) -> usize {
        self.nodes[..index.min(self.nodes.len())]
            .iter()
            .map(ExpressionNode::len)
            .sum()
    }

    /// Token under the caret.
    ///
    /// The active token wins when the caret touches it (so an empty active
    /// placeholder is not skipped); otherwise the first token whose range
    /// `[start, end)` holds the caret; otherwise the last token.
    pub fn token_at(&self, caret: usize) -> Option<usize> {
        if self.nodes.is_empty() {
            return None;
        }
        if let Some(active) = self.active_index() {
            let start = self.start_of(active);
            if (start..=start + self.nodes[active].len()).contains(&caret) {
                return Some(active);
            }
        }
        let mut start = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            let end = start + node.len();
            if caret >= start && caret < end {
                return Some(index);
            }
            start = end;
        }
        Some(self.nodes.len() - 1)
    }

    /// Token under the caret, inserting an empty placeholder into an empty sequence
    pub fn force_token_at(&mut self, caret: usize) -> usize {
        match self.token_at(caret) {
            Some(index) => index,
            None => {
                self.push(ExpressionNode::new());
                0
            }
        }
    }

    /// Caret offset inside a token, clamped to its text
    pub fn caret_within_token(&self, index: usize, caret: usize) -> usize {
        let len = self.nodes.get(index).map_or(0, ExpressionNode::len);
        caret.saturating_sub(self.start_of(index)).min(len)
    }

    /// Inverse of [`Self::caret_within_token`]
    pub fn absolute_caret(&self, index: usize, inner: usize) -> usize {
        self.start_of(index) + inner
    }

    /// Caret as a (token index, inner offset) pair for rendering
    pub fn caret_position(&self, caret: usize) -> CaretPosition {
        match self.token_at(caret) {
            Some(index) => {
                let position = CaretPosition::new(index, self.caret_within_token(index, caret));
                tracing::trace!("caret {} -> {}", caret, position);
                position
            }
            None => CaretPosition::default(),
        }
    }

    // === Mutation ===

    fn assign_id(&mut self, mut node: ExpressionNode) -> ExpressionNode {
        node.id = NodeId(self.next_id);
        self.next_id += 1;
        node
    }

    /// Insert at an index (clamped to the end), returning the new handle
    pub fn insert_at(&mut self, index: usize, node: ExpressionNode) -> NodeId {
        let node = self.assign_id(node);
        let id = node.id;
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
        id
    }

    pub fn insert_before(&mut self, index: usize, node: ExpressionNode) -> NodeId {
        self.insert_at(index, node)
    }

    pub fn insert_after(&mut self, index: usize, node: ExpressionNode) -> NodeId {
        self.insert_at(index + 1, node)
    }

    /// Insert several tokens in order starting at `index`
    pub fn insert_all_at(&mut self, index: usize, nodes: Vec<ExpressionNode>) -> Vec<NodeId> {
        nodes
            .into_iter()
            .enumerate()
            .map(|(offset, node)| self.insert_at(index + offset, node))
            .collect()
    }

    pub fn push(&mut self, node: ExpressionNode) -> NodeId {
        self.insert_at(self.nodes.len(), node)
    }

    /// Remove a token, clearing the active handle if it pointed there
    pub fn remove(&mut self, index: usize) -> Option<ExpressionNode> {
        if index >= self.nodes.len() {
            return None;
        }
        let node = self.nodes.remove(index);
        if self.active == Some(node.id) {
            self.active = None;
        }
        Some(node)
    }

    pub fn remove_id(&mut self, id: NodeId) -> Option<ExpressionNode> {
        let index = self.index_of(id)?;
        self.remove(index)
    }

    // === Chains ===

    /// Inserting directly before `index` would not split a chain
    pub fn can_insert_before(&self, index: usize) -> bool {
        index == 0
            || index >= self.nodes.len()
            || !self.nodes[index - 1].is_joined_with(&self.nodes[index])
    }

    /// Inserting directly after `index` would not split a chain
    pub fn can_insert_after(&self, index: usize) -> bool {
        index + 1 >= self.nodes.len() || !self.nodes[index].is_joined_with(&self.nodes[index + 1])
    }

    /// First legal insertion index after `index`, walking past joined runs
    pub fn insert_after_position(&self, index: usize) -> usize {
        let mut current = index;
        while !self.can_insert_after(current) {
            current += 1;
        }
        current + 1
    }

    /// Indices of the tokens after `index` that share its chain key
    pub fn chain_tail_from(&self, index: usize) -> Vec<usize> {
        let mut tail = Vec::new();
        let Some(head) = self.nodes.get(index) else {
            return tail;
        };
        if head.chain_key().is_empty() {
            return tail;
        }
        let mut next = index + 1;
        while next < self.nodes.len() && self.nodes[next].chain_key() == head.chain_key() {
            tail.push(next);
            next += 1;
        }
        tail
    }

    /// Merge `right` into `left` and remove it; false if either side refuses
    pub fn try_merge(&mut self, left: usize, right: usize) -> bool {
        if left >= self.nodes.len() || right >= self.nodes.len() || left == right {
            return false;
        }
        let other = self.nodes[right].clone();
        if !self.nodes[left].merge(&other) {
            return false;
        }
        self.remove(right);
        true
    }

    // === Deletion marks ===

    /// Mark a token and its forward chain
    pub fn mark_chain_from(&mut self, index: usize) {
        let tail = self.chain_tail_from(index);
        for i in std::iter::once(index).chain(tail) {
            if let Some(node) = self.nodes.get_mut(i) {
                node.mark_for_deletion();
            }
        }
    }

    /// Unmark a token and its forward chain
    pub fn unmark_chain_from(&mut self, index: usize) {
        let tail = self.chain_tail_from(index);
        for i in std::iter::once(index).chain(tail) {
            if let Some(node) = self.nodes.get_mut(i) {
                node.unmark_for_deletion();
            }
        }
    }

    pub fn has_pending_deletion(&self) -> bool {
        self.nodes.iter().any(|n| n.marked_for_deletion)
    }

    pub fn pending_deletion_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.marked_for_deletion)
            .map(|n| n.id)
            .collect()
    }

    pub fn clear_pending_deletion(&mut self) {
        for node in &mut self.nodes {
            node.unmark_for_deletion();
        }
    }

    /// Remove every marked token, returning the index the first one occupied
    pub fn remove_marked(&mut self) -> Option<usize> {
        let first = self.nodes.iter().position(|n| n.marked_for_deletion)?;
        let mut index = first;
        while index < self.nodes.len() {
            if self.nodes[index].marked_for_deletion {
                self.remove(index);
            } else {
                index += 1;
            }
        }
        Some(first)
    }

    // === Maintenance ===

    /// Drop empty tokens except the active one; returns how many were removed
    pub fn purge_empty(&mut self) -> usize {
        let before = self.nodes.len();
        let active = self.active;
        self.nodes.retain(|n| !n.is_empty() || Some(n.id) == active);
        before - self.nodes.len()
    }

    /// Reclassify literal tokens as constants of the type their text spells
    pub fn reconcile_constant_types(&mut self) {
        for node in &mut self.nodes {
            if !node.can_change_type() || node.is_empty() {
                continue;
            }
            node.content.kind = NodeKind::Constant;
            node.content.value_type = classify_literal(node.text());
        }
    }

    // === Views ===

    pub fn to_display_list(&self) -> Vec<DisplayNode> {
        self.nodes
            .iter()
            .map(|n| DisplayNode::from_node(n, self.is_active(n.id)))
            .collect()
    }

    /// JSON snapshot of the tokens and the active handle
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Snapshot {
            active: self.active,
            nodes: &self.nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeContent, NodeGenerator, ValueType};

    fn constant(text: &str) -> ExpressionNode {
        ExpressionNode::with_content(NodeContent {
            kind: NodeKind::Constant,
            text: text.to_string(),
            ..NodeContent::default()
        })
    }

    fn chained(mut node: ExpressionNode, key: &str) -> ExpressionNode {
        node.set_chain_key(key);
        node
    }

    fn texts(sequence: &Sequence) -> Vec<&str> {
        sequence.nodes().iter().map(|n| n.text()).collect()
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut sequence = Sequence::new();
        let a = sequence.push(constant("a"));
        let b = sequence.push(constant("b"));
        assert_ne!(a, b);
        sequence.remove(0);
        let c = sequence.push(constant("c"));
        assert_ne!(a, c);
        assert!(!c.is_detached());
    }

    #[test]
    fn test_token_at_prefers_right_token_at_boundary() {
        let sequence = Sequence::from_nodes([constant("ab"), NodeGenerator::operator("+")]);
        assert_eq!(sequence.token_at(0), Some(0));
        assert_eq!(sequence.token_at(1), Some(0));
        assert_eq!(sequence.token_at(2), Some(1));
        // End of text falls back to the last token
        assert_eq!(sequence.token_at(3), Some(1));
    }

    #[test]
    fn test_token_at_prefers_active_placeholder() {
        let mut sequence = Sequence::from_nodes([constant("ab"), NodeGenerator::placeholder()]);
        assert_eq!(sequence.token_at(2), Some(1));
        sequence.insert_at(2, constant("cd"));
        // Without an active binding the first containing token wins
        assert_eq!(sequence.token_at(2), Some(2));
        let placeholder = sequence.node(1).map(|n| n.id);
        sequence.set_active(placeholder);
        assert_eq!(sequence.token_at(2), Some(1));
    }

    #[test]
    fn test_token_at_empty_sequence() {
        let mut sequence = Sequence::new();
        assert_eq!(sequence.token_at(0), None);
        assert_eq!(sequence.force_token_at(0), 0);
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn test_caret_round_trip() {
        let mut sequence = Sequence::from_nodes([
            constant("12"),
            NodeGenerator::operator("+"),
            NodeGenerator::placeholder(),
            constant("ñx"),
        ]);
        for active in [None, sequence.node(2).map(|n| n.id)] {
            sequence.set_active(active);
            for caret in 0..=sequence.total_length() {
                let index = sequence.token_at(caret).unwrap();
                let inner = sequence.caret_within_token(index, caret);
                assert_eq!(sequence.absolute_caret(index, inner), caret);
            }
        }
    }

    #[test]
    fn test_caret_position() {
        let sequence = Sequence::from_nodes([constant("ab"), constant("cd")]);
        assert_eq!(sequence.caret_position(3), CaretPosition::new(1, 1));
        assert_eq!(sequence.caret_position(4), CaretPosition::new(1, 2));
        assert_eq!(Sequence::new().caret_position(5), CaretPosition::default());
    }

    #[test]
    fn test_remove_clears_active() {
        let mut sequence = Sequence::from_nodes([constant("a"), NodeGenerator::placeholder()]);
        let id = sequence.node(1).map(|n| n.id);
        sequence.set_active(id);
        assert_eq!(sequence.active_index(), Some(1));
        sequence.remove(1);
        assert_eq!(sequence.active(), None);
    }

    #[test]
    fn test_set_active_rejects_unknown_handle() {
        let mut sequence = Sequence::from_nodes([constant("a")]);
        sequence.set_active(Some(NodeId(999)));
        assert_eq!(sequence.active(), None);
    }

    #[test]
    fn test_chain_blocks_insertion() {
        let sequence = Sequence::from_nodes([
            chained(NodeGenerator::column("Account", "Contact", ValueType::Lookup), "k"),
            chained(NodeGenerator::operator("."), "k"),
            chained(NodeGenerator::column("Name", "Account", ValueType::Text), "k"),
            constant("x"),
        ]);
        assert!(!sequence.can_insert_after(0));
        assert!(!sequence.can_insert_before(1));
        assert!(sequence.can_insert_after(2));
        assert!(sequence.can_insert_before(0));
        assert_eq!(sequence.insert_after_position(0), 3);
        assert_eq!(sequence.insert_after_position(3), 4);
    }

    #[test]
    fn test_chain_tail_from() {
        let sequence = Sequence::from_nodes([
            chained(constant("a"), "k"),
            chained(constant("b"), "k"),
            chained(constant("c"), "k"),
            chained(constant("d"), "other"),
        ]);
        assert_eq!(sequence.chain_tail_from(0), vec![1, 2]);
        assert_eq!(sequence.chain_tail_from(2), Vec::<usize>::new());
        assert!(Sequence::from_nodes([constant("a"), constant("b")])
            .chain_tail_from(0)
            .is_empty());
    }

    #[test]
    fn test_try_merge() {
        let mut sequence =
            Sequence::from_nodes([constant("12"), NodeGenerator::operator("+"), constant("34")]);
        assert!(!sequence.try_merge(0, 1));
        sequence.remove(1);
        assert!(sequence.try_merge(0, 1));
        assert_eq!(texts(&sequence), vec!["1234"]);
    }

    #[test]
    fn test_mark_and_remove_marked() {
        let mut sequence = Sequence::from_nodes([
            constant("x"),
            chained(NodeGenerator::column("Account", "Contact", ValueType::Lookup), "k"),
            chained(NodeGenerator::operator("."), "k"),
            constant("y"),
        ]);
        sequence.mark_chain_from(1);
        assert!(sequence.has_pending_deletion());
        assert_eq!(sequence.pending_deletion_ids().len(), 2);

        let first = sequence.remove_marked();
        assert_eq!(first, Some(1));
        assert_eq!(texts(&sequence), vec!["x", "y"]);
        assert!(!sequence.has_pending_deletion());
    }

    #[test]
    fn test_clear_pending_deletion() {
        let mut sequence = Sequence::from_nodes([constant("a"), constant("b")]);
        sequence.mark_chain_from(0);
        sequence.mark_chain_from(1);
        sequence.clear_pending_deletion();
        assert!(!sequence.has_pending_deletion());
        assert_eq!(sequence.remove_marked(), None);
    }

    #[test]
    fn test_purge_empty_keeps_active() {
        let mut sequence = Sequence::from_nodes([
            constant("a"),
            ExpressionNode::new(),
            NodeGenerator::placeholder(),
        ]);
        let active = sequence.node(2).map(|n| n.id);
        sequence.set_active(active);
        assert_eq!(sequence.purge_empty(), 1);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.active_index(), Some(1));
    }

    #[test]
    fn test_reconcile_constant_types() {
        let mut unset = ExpressionNode::new();
        unset.append("Account");
        let mut sequence = Sequence::from_nodes([
            constant("12"),
            NodeGenerator::operator("+"),
            constant("1.5"),
            constant("\"hi\""),
            unset,
            NodeGenerator::column("Name", "Contact", ValueType::Text),
        ]);
        sequence.reconcile_constant_types();
        let types: Vec<_> = sequence.nodes().iter().map(|n| n.value_type()).collect();
        assert_eq!(
            types,
            vec![
                ValueType::Integer,
                ValueType::Unset,
                ValueType::Float,
                ValueType::Text,
                ValueType::Unset,
                ValueType::Text,
            ]
        );
        assert_eq!(sequence.node(4).map(|n| n.kind()), Some(NodeKind::Constant));
        assert_eq!(sequence.node(1).map(|n| n.kind()), Some(NodeKind::Operator));
    }

    #[test]
    fn test_reconcile_skips_edit_status() {
        let mut placeholder = NodeGenerator::placeholder();
        placeholder.append("42");
        let mut sequence = Sequence::from_nodes([placeholder]);
        sequence.reconcile_constant_types();
        assert_eq!(sequence.node(0).map(|n| n.kind()), Some(NodeKind::Unset));
    }

    #[test]
    fn test_display_list_flags_active() {
        let mut sequence = Sequence::from_nodes([constant("a"), NodeGenerator::placeholder()]);
        let id = sequence.node(1).map(|n| n.id);
        sequence.set_active(id);
        let display = sequence.to_display_list();
        assert!(!display[0].is_active);
        assert!(display[1].is_active);
    }

    #[test]
    fn test_to_json() {
        let sequence = Sequence::from_nodes([constant("a")]);
        let json = sequence.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][0]["text"], "a");
        assert_eq!(value["nodes"][0]["kind"], "Constant");
        assert!(value["active"].is_null());
    }

    #[test]
    fn test_next_chain_key_is_unique() {
        let mut sequence = Sequence::new();
        assert_ne!(sequence.next_chain_key(), sequence.next_chain_key());
    }
}
