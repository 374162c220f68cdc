//! Catalog picks: applying a selection to the active token, toggling it off,
//! and describing what the autocomplete list should search for

use tracing::debug;

use crate::catalog::{CatalogItem, CatalogRequest, Filter};
use crate::model::generator::DOT;
use crate::model::{NodeGenerator, NodeKind};

use super::key_processor::{KeyProcessor, PickMemo};

impl KeyProcessor {
    /// Apply the user's choice from the autocomplete list to the active token.
    ///
    /// Choosing what the token already represents toggles the pick off.
    pub fn apply_catalog_item(&mut self, item: &CatalogItem) {
        let Some(index) = self.sequence.active_index() else {
            debug!(target: "dispatch", identity = %item.identity, "pick ignored: no active token");
            return;
        };
        let node = &self.sequence.nodes()[index];

        if node.represented_identity() == Some(item.identity.as_str()) {
            self.toggle_off(index);
            return;
        }
        if !node.edit_status {
            debug!(target: "dispatch", identity = %item.identity, "pick ignored: token not in edit status");
            return;
        }

        let id = node.id;
        let previous = node.backup().cloned();
        let caret_before = self.caret;

        if let Some(node) = self.sequence.node_mut(index) {
            node.apply_catalog_data(item);
        }

        // Tokens of the same chain before the pick stay; the marked tail goes
        let mut head = index;
        while head > 0 && self.sequence.nodes()[head - 1].is_joined_with(&self.sequence.nodes()[head]) {
            head -= 1;
            if let Some(node) = self.sequence.node_mut(head) {
                node.unmark_for_deletion();
            }
        }
        self.sequence.remove_marked();

        let Some(index) = self.sequence.index_of(id) else {
            return;
        };

        let scaffold = if item.kind == NodeKind::Function {
            let chain_key = match self.sequence.nodes()[index].chain_key() {
                "" => self.sequence.next_chain_key(),
                key => key.to_string(),
            };
            if let Some(node) = self.sequence.node_mut(index) {
                node.set_chain_key(chain_key.as_str());
            }
            let scaffold = NodeGenerator::argument_scaffold(item.arguments.len(), &chain_key);
            let ids = self.sequence.insert_all_at(index + 1, scaffold);
            // Just inside the opening bracket
            self.caret = self.sequence.start_of(index + 1) + 1;
            ids
        } else {
            self.caret = self.sequence.absolute_caret(index, self.sequence.nodes()[index].len());
            Vec::new()
        };

        self.sequence.set_active(Some(id));
        self.last_pick = Some(PickMemo {
            id,
            previous,
            caret_before,
            scaffold,
        });
        debug!(target: "dispatch", identity = %item.identity, caret = self.caret, "catalog item applied");
    }

    /// Undo the pick on the active token
    fn toggle_off(&mut self, index: usize) {
        let id = self.sequence.nodes()[index].id;
        match self.last_pick.take().filter(|memo| memo.id == id) {
            Some(memo) => {
                if let Some(node) = self.sequence.get_mut(id) {
                    node.restore(memo.previous);
                }
                for scaffold_id in memo.scaffold {
                    self.sequence.remove_id(scaffold_id);
                }
                self.caret = memo.caret_before;
            }
            None => {
                let Some(node) = self.sequence.get_mut(id) else {
                    return;
                };
                if !node.edit_status {
                    debug!(target: "dispatch", "toggle ignored: pick already settled");
                    return;
                }
                node.rollback();
            }
        }

        self.sequence.clear_pending_deletion();
        self.sequence.clear_active();
        self.caret = self.caret.min(self.sequence.total_length());
        debug!(target: "dispatch", caret = self.caret, "catalog pick toggled off");
    }

    /// What the autocomplete list should show for the active token
    pub fn catalog_request(&self) -> Option<CatalogRequest> {
        let index = self.sequence.active_index()?;
        let nodes = self.sequence.nodes();
        let node = &nodes[index];
        if !node.edit_status {
            return None;
        }

        let referenced = if index >= 2 {
            let dot = &nodes[index - 1];
            if dot.kind() == NodeKind::Operator && dot.text() == DOT && dot.is_joined_with(node) {
                nodes[index - 2].content.reference_schema_ref.as_deref()
            } else {
                None
            }
        } else {
            None
        };
        let filter = match referenced {
            Some(schema) => Filter::drill_down(schema),
            None => Filter::root(&self.config.root_schema),
        };

        Some(CatalogRequest::new(node.text(), filter).with_last_key(self.last_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::keymap::{default_classifier, KeyCode, Keystroke};
    use crate::model::{Argument, ValueType};

    fn processor() -> KeyProcessor {
        KeyProcessor::with_classifier(EngineConfig::default(), default_classifier())
    }

    fn press(p: &mut KeyProcessor, key: KeyCode) {
        p.dispatch(Keystroke::key(key));
        p.sequence_mut().purge_empty();
    }

    fn account() -> CatalogItem {
        CatalogItem {
            identity: "col-account".to_string(),
            title: "Account".to_string(),
            code: "Account".to_string(),
            kind: NodeKind::Column,
            value_type: ValueType::Lookup,
            schema_ref: Some("Contact".to_string()),
            reference_schema_ref: Some("Account".to_string()),
            arguments: Vec::new(),
        }
    }

    fn datediff() -> CatalogItem {
        CatalogItem {
            identity: "fn-datediff".to_string(),
            title: "DATEDIFF".to_string(),
            code: "DATEDIFF".to_string(),
            kind: NodeKind::Function,
            value_type: ValueType::Integer,
            schema_ref: None,
            reference_schema_ref: None,
            arguments: vec![
                Argument::new("from", ValueType::DateTime),
                Argument::new("to", ValueType::DateTime),
            ],
        }
    }

    fn texts(p: &KeyProcessor) -> Vec<String> {
        p.sequence().nodes().iter().map(|n| n.text().to_string()).collect()
    }

    #[test]
    fn test_pick_without_active_token_is_ignored() {
        let mut p = processor();
        p.apply_catalog_item(&account());
        assert!(p.sequence().is_empty());
    }

    #[test]
    fn test_pick_replaces_placeholder() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&account());
        assert_eq!(texts(&p), vec!["Account"]);
        assert_eq!(p.sequence().nodes()[0].kind(), NodeKind::Column);
        assert_eq!(p.caret(), 7);
        // Binding survives until the next key
        assert_eq!(p.sequence().active_index(), Some(0));
        press(&mut p, KeyCode::Right);
        assert_eq!(p.sequence().active(), None);
    }

    #[test]
    fn test_function_pick_adds_scaffold() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&datediff());
        assert_eq!(texts(&p), vec!["DATEDIFF", "(", ",", ")"]);
        assert_eq!(p.caret(), 9);
        let nodes = p.sequence().nodes();
        assert!(nodes[0].is_joined_with(&nodes[1]));
        assert!(!nodes[1].is_joined_with(&nodes[2]));
    }

    #[test]
    fn test_repick_toggles_off() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('1'));
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&datediff());
        p.apply_catalog_item(&datediff());
        p.sequence_mut().purge_empty();
        assert_eq!(texts(&p), vec!["1"]);
        assert_eq!(p.caret(), 1);
        assert_eq!(p.sequence().active(), None);
    }

    #[test]
    fn test_pick_on_staged_column_replaces_it() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&account());
        press(&mut p, KeyCode::Backspace);
        assert!(p.sequence().has_pending_deletion());

        let owner = CatalogItem {
            identity: "col-owner".to_string(),
            title: "Owner".to_string(),
            ..account()
        };
        p.apply_catalog_item(&owner);
        assert_eq!(texts(&p), vec!["Owner"]);
        assert!(!p.sequence().has_pending_deletion());
    }

    #[test]
    fn test_same_pick_on_staged_column_rolls_back() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&account());
        press(&mut p, KeyCode::Backspace);
        p.apply_catalog_item(&account());
        assert_eq!(texts(&p), vec!["Account"]);
        assert!(!p.sequence().has_pending_deletion());
        assert!(!p.sequence().nodes()[0].edit_status);
    }

    #[test]
    fn test_request_uses_root_filter() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        press(&mut p, KeyCode::Char('A'));
        let request = p.catalog_request().expect("placeholder is in edit status");
        assert_eq!(request.title_prefix, "A");
        assert_eq!(request.filter, Filter::root("Contact"));
        assert_eq!(request.last_key, Some(Keystroke::char('A')));
    }

    #[test]
    fn test_request_after_dot_drills_down() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('@'));
        p.apply_catalog_item(&account());
        press(&mut p, KeyCode::Char('.'));
        let request = p.catalog_request().expect("drill-down placeholder");
        assert_eq!(request.filter, Filter::drill_down("Account"));
        assert_eq!(request.title_prefix, "");
    }

    #[test]
    fn test_no_request_without_edit_status() {
        let mut p = processor();
        press(&mut p, KeyCode::Char('1'));
        assert!(p.catalog_request().is_none());
    }
}
