//! Session - serial event queue in front of the key processor
//!
//! Events are applied one at a time in arrival order. After each event, empty
//! inactive tokens are purged; once the queue drains, literals are classified
//! and a single [`ProcessResult`] is published.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::catalog::{CatalogItem, CatalogSource};
use crate::keymap::Keystroke;

use super::key_processor::KeyProcessor;
use super::messages::EditorEvent;
use super::result::ProcessResult;

type Subscriber = Box<dyn FnMut(&ProcessResult)>;

pub struct Session {
    processor: KeyProcessor,
    queue: VecDeque<EditorEvent>,
    catalog: Option<Box<dyn CatalogSource>>,
    subscribers: Vec<Subscriber>,
}

impl Session {
    pub fn new(processor: KeyProcessor) -> Self {
        Self {
            processor,
            queue: VecDeque::new(),
            catalog: None,
            subscribers: Vec::new(),
        }
    }

    /// Attach the catalog used to fill `ProcessResult::suggestions`
    pub fn with_catalog(mut self, catalog: Box<dyn CatalogSource>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn processor(&self) -> &KeyProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut KeyProcessor {
        &mut self.processor
    }

    /// Call `f` with every published result
    pub fn subscribe(&mut self, f: impl FnMut(&ProcessResult) + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Number of events waiting for the next drain
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue an event without processing it
    pub fn enqueue(&mut self, event: EditorEvent) {
        self.queue.push_back(event);
    }

    // === Ingress ===

    pub fn submit_key(&mut self, key: Keystroke, caret: usize) -> ProcessResult {
        self.submit([EditorEvent::Key(key)], Some(caret))
    }

    pub fn submit_paste_text(&mut self, text: &str, caret: usize) -> ProcessResult {
        self.submit([EditorEvent::Paste(text.to_string())], Some(caret))
    }

    /// Apply a pick from the autocomplete list; the caret is the processor's own
    pub fn submit_catalog_selection(&mut self, item: CatalogItem) -> ProcessResult {
        self.submit([EditorEvent::CatalogSelection(item)], None)
    }

    /// Queue events and drain.
    ///
    /// `caret` seeds the processor only when nothing else is queued, so a
    /// caret reported mid-batch cannot overtake earlier keys.
    pub fn submit(
        &mut self,
        events: impl IntoIterator<Item = EditorEvent>,
        caret: Option<usize>,
    ) -> ProcessResult {
        if self.queue.is_empty() {
            if let Some(caret) = caret {
                self.processor.set_caret(caret);
            }
        }
        self.queue.extend(events);
        self.drain()
    }

    /// Apply every queued event, then publish the result
    pub fn drain(&mut self) -> ProcessResult {
        let mut applied = 0usize;
        while let Some(event) = self.queue.pop_front() {
            match event {
                EditorEvent::Paste(text) => {
                    // Pasted characters run ahead of anything queued after the paste
                    for key in Keystroke::from_text(&text).into_iter().rev() {
                        self.queue.push_front(EditorEvent::Key(key));
                    }
                }
                event => {
                    debug!(target: "session", event = %event.name(), "applying");
                    self.processor.handle(event);
                    self.processor.sequence_mut().purge_empty();
                    applied += 1;
                }
            }
        }

        self.processor.finish_batch();
        let result = self.result();
        debug!(target: "session", applied, caret = result.caret, "batch published");
        for subscriber in &mut self.subscribers {
            subscriber(&result);
        }
        result
    }

    /// Current state as a publishable result
    pub fn result(&self) -> ProcessResult {
        let caret = self.processor.caret();
        let sequence = self.processor.sequence();
        let autocomplete = self.processor.catalog_request();

        let suggestions = match (&autocomplete, &self.catalog) {
            (Some(request), Some(catalog)) => match catalog.search(request) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Catalog search failed: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        ProcessResult {
            caret,
            position: sequence.caret_position(caret),
            display: sequence.to_display_list(),
            autocomplete,
            suggestions,
        }
    }
}
