//! KeyProcessor - the keystroke state machine
//!
//! State is the caret plus the sequence's active handle. Each key runs
//! through a fixed, prioritized rule table; the first rule that applies and
//! finishes handles the key.

#[cfg(debug_assertions)]
use tracing::{span, Level};
use tracing::debug;

use crate::config::{CancelCaret, EngineConfig};
use crate::keymap::{KeyCategory, KeyClassifier, KeyCode, Keystroke};
use crate::model::{NodeContent, NodeId};
use crate::sequence::Sequence;

#[cfg(debug_assertions)]
use crate::tracing::SequenceSnapshot;

use super::extend::ExtendSource;
use super::messages::EditorEvent;

/// Whether the rule table keeps looking after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Done,
    Continue,
}

type Predicate = fn(&KeyProcessor, &Keystroke) -> bool;
type Handler = fn(&mut KeyProcessor, &Keystroke) -> Flow;

struct Rule {
    name: &'static str,
    applies: Predicate,
    handle: Handler,
}

/// Dispatch rules in priority order
const RULES: &[Rule] = &[
    Rule {
        name: "swallow",
        applies: is_swallowed,
        handle: finish,
    },
    Rule {
        name: "cancel",
        applies: is_cancel_of_edit,
        handle: handle_cancel,
    },
    Rule {
        name: "list_navigation",
        applies: is_list_navigation,
        handle: finish,
    },
    Rule {
        name: "abandon_staged_deletion",
        applies: abandons_staged_deletion,
        handle: handle_abandon,
    },
    Rule {
        name: "remove",
        applies: is_remove,
        handle: handle_remove,
    },
    Rule {
        name: "changeless",
        applies: is_changeless,
        handle: finish,
    },
    Rule {
        name: "move",
        applies: is_horizontal_move,
        handle: handle_move,
    },
    Rule {
        name: "structural_insert",
        applies: is_structural_insert,
        handle: handle_structural_insert,
    },
    Rule {
        name: "command",
        applies: is_command_at_boundary,
        handle: handle_command,
    },
    Rule {
        name: "character",
        applies: always,
        handle: handle_character,
    },
];

fn always(_: &KeyProcessor, _: &Keystroke) -> bool {
    true
}

fn finish(_: &mut KeyProcessor, _: &Keystroke) -> Flow {
    Flow::Done
}

fn is_swallowed(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is_swallowed(key)
}

fn is_cancel_of_edit(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is(KeyCategory::Cancel, key)
        && p.sequence.active_node().is_some_and(|n| n.edit_status)
}

fn is_list_navigation(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is(KeyCategory::VerticalMove, key) || p.classifier.is(KeyCategory::Enter, key)
}

fn abandons_staged_deletion(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.sequence.has_pending_deletion() && !p.classifier.keeps_staged_deletion(key)
}

fn is_remove(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is(KeyCategory::Remove, key)
}

fn is_changeless(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is(KeyCategory::Changeless, key)
}

fn is_horizontal_move(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is(KeyCategory::HorizontalMove, key)
}

fn is_structural_insert(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is_single_operation(key) && !p.caret_inside_text_literal()
}

fn is_command_at_boundary(p: &KeyProcessor, key: &Keystroke) -> bool {
    p.classifier.is_command(key) && p.caret_at_boundary()
}

fn handle_cancel(p: &mut KeyProcessor, _: &Keystroke) -> Flow {
    p.cancel();
    Flow::Done
}

fn handle_abandon(p: &mut KeyProcessor, _: &Keystroke) -> Flow {
    p.abandon_staged_deletion();
    Flow::Continue
}

fn handle_remove(p: &mut KeyProcessor, key: &Keystroke) -> Flow {
    p.delete(key.key == KeyCode::Delete);
    Flow::Done
}

fn handle_move(p: &mut KeyProcessor, key: &Keystroke) -> Flow {
    p.move_caret(key.key);
    Flow::Done
}

fn handle_structural_insert(p: &mut KeyProcessor, key: &Keystroke) -> Flow {
    if let Some(text) = key.text() {
        p.insert_operator(&text);
    }
    Flow::Done
}

fn handle_command(p: &mut KeyProcessor, _: &Keystroke) -> Flow {
    p.open_catalog_pick();
    Flow::Done
}

fn handle_character(p: &mut KeyProcessor, key: &Keystroke) -> Flow {
    if let KeyCode::Char(c) = key.key {
        p.type_char(c);
    }
    Flow::Done
}

/// Bookkeeping of the last successful catalog pick, kept until the next key
#[derive(Debug, Clone)]
pub(super) struct PickMemo {
    pub id: NodeId,
    /// Content the token had before the pick
    pub previous: Option<NodeContent>,
    pub caret_before: usize,
    /// Argument scaffold generated by the pick
    pub scaffold: Vec<NodeId>,
}

/// The keystroke state machine
pub struct KeyProcessor {
    pub(super) sequence: Sequence,
    pub(super) classifier: KeyClassifier,
    pub(super) config: EngineConfig,
    pub(super) extend: Option<Box<dyn ExtendSource>>,
    pub(super) caret: usize,
    pub(super) last_key: Option<Keystroke>,
    pub(super) last_pick: Option<PickMemo>,
}

impl KeyProcessor {
    /// Create a processor using the config's key classes
    pub fn new(config: EngineConfig) -> Self {
        let classifier = config.classifier();
        Self::with_classifier(config, classifier)
    }

    pub fn with_classifier(config: EngineConfig, classifier: KeyClassifier) -> Self {
        Self {
            sequence: Sequence::new(),
            classifier,
            config,
            extend: None,
            caret: 0,
            last_key: None,
            last_pick: None,
        }
    }

    /// Attach a drill-down continuation source
    pub fn with_extend_source(mut self, source: Box<dyn ExtendSource>) -> Self {
        self.extend = Some(source);
        self
    }

    /// Start from an existing sequence, caret at its end
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.caret = sequence.total_length();
        self.sequence = sequence;
        self
    }

    // === Accessors ===

    #[inline]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, clamped to the text
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.sequence.total_length());
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    pub fn classifier(&self) -> &KeyClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn last_key(&self) -> Option<Keystroke> {
        self.last_key
    }

    // === Event entry points ===

    /// Apply one queued event. Paste events are expanded by the session.
    pub fn handle(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Key(key) => self.dispatch(key),
            EditorEvent::Paste(text) => {
                for key in Keystroke::from_text(&text) {
                    self.dispatch(key);
                }
            }
            EditorEvent::CatalogSelection(item) => self.apply_catalog_item(&item),
        }
    }

    /// Dispatch a single keystroke
    ///
    /// In debug builds, this wraps with tracing instrumentation.
    #[inline]
    pub fn dispatch(&mut self, key: Keystroke) {
        #[cfg(debug_assertions)]
        {
            self.dispatch_traced(key)
        }
        #[cfg(not(debug_assertions))]
        {
            self.dispatch_inner(key)
        }
    }

    fn dispatch_inner(&mut self, key: Keystroke) {
        self.last_key = Some(key);
        self.last_pick = None;
        self.release_binding();

        for rule in RULES {
            if !(rule.applies)(self, &key) {
                continue;
            }
            debug!(target: "dispatch", %key, rule = rule.name, "matched");
            if (rule.handle)(self, &key) == Flow::Done {
                break;
            }
        }

        self.caret = self.caret.min(self.sequence.total_length());
    }

    /// Traced dispatch wrapper (debug builds only)
    ///
    /// Captures before/after caret and token state and logs the diff.
    #[cfg(debug_assertions)]
    fn dispatch_traced(&mut self, key: Keystroke) {
        let _span = span!(Level::DEBUG, "dispatch", key = %key).entered();
        let before = SequenceSnapshot::capture(&self.sequence, self.caret);

        self.dispatch_inner(key);

        let after = SequenceSnapshot::capture(&self.sequence, self.caret);
        if let Some(diff) = before.diff(&after) {
            debug!(target: "sequence", %diff, "state changed");
        }
        debug_assert!(self.caret <= self.sequence.total_length());
    }

    /// Publish-time maintenance: classify literals
    pub fn finish_batch(&mut self) {
        self.sequence.reconcile_constant_types();
    }

    // === Active binding ===

    /// Drop an active binding whose token already left edit status
    fn release_binding(&mut self) {
        if self.sequence.active_node().is_some_and(|n| !n.edit_status) {
            debug!(target: "dispatch", "released catalog binding");
            self.sequence.clear_active();
        }
    }

    /// Roll back the active token and close its catalog pick
    pub(super) fn cancel(&mut self) {
        let Some(index) = self.sequence.active_index() else {
            return;
        };
        if let Some(node) = self.sequence.node_mut(index) {
            node.rollback();
        }
        self.sequence.clear_pending_deletion();

        self.caret = match self.config.cancel_caret {
            CancelCaret::Restore => {
                let len = self.sequence.node(index).map_or(0, |n| n.len());
                self.sequence.start_of(index) + len
            }
            CancelCaret::Clamp => self.caret.min(self.sequence.total_length()),
        };
        self.sequence.clear_active();
        debug!(target: "dispatch", caret = self.caret, "catalog pick cancelled");
    }

    /// Undo a first-stage deletion the user walked away from
    pub(super) fn abandon_staged_deletion(&mut self) {
        if let Some(node) = self.sequence.active_node_mut() {
            if node.edit_status && node.marked_for_deletion {
                node.rollback();
            }
        }
        if self
            .sequence
            .active_node()
            .is_some_and(|n| !n.edit_status)
        {
            self.sequence.clear_active();
        }
        self.sequence.clear_pending_deletion();
        debug!(target: "dispatch", "staged deletion abandoned");
    }

    // === Caret movement ===

    pub(super) fn move_caret(&mut self, key: KeyCode) {
        let total = self.sequence.total_length();
        self.caret = match key {
            KeyCode::Left => self.caret.saturating_sub(1),
            KeyCode::Right => (self.caret + 1).min(total),
            KeyCode::Home => 0,
            KeyCode::End => total,
            _ => self.caret,
        };

        // The binding follows the caret only onto tokens under edit
        let snapped = self
            .sequence
            .token_at(self.caret)
            .and_then(|index| self.sequence.node(index))
            .filter(|node| node.edit_status)
            .map(|node| node.id);
        self.sequence.set_active(snapped);
    }

    // === Caret queries ===

    /// Token index and inner offset under the caret
    pub(super) fn caret_token(&self) -> Option<(usize, usize)> {
        let index = self.sequence.token_at(self.caret)?;
        Some((index, self.sequence.caret_within_token(index, self.caret)))
    }

    /// Caret strictly inside an editable text literal
    pub(super) fn caret_inside_text_literal(&self) -> bool {
        let Some((index, inner)) = self.caret_token() else {
            return false;
        };
        self.sequence
            .node(index)
            .is_some_and(|node| super::edit::is_inside_text_literal(node, inner))
    }

    /// Caret at the start or end of the token under it
    pub(super) fn caret_at_boundary(&self) -> bool {
        match self.caret_token() {
            None => true,
            Some((index, inner)) => {
                inner == 0 || self.sequence.node(index).is_some_and(|n| inner >= n.len())
            }
        }
    }
}
