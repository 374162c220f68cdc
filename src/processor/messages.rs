//! Events accepted by the session queue

use crate::catalog::CatalogItem;
use crate::keymap::Keystroke;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A single keystroke
    Key(Keystroke),
    /// Already-extracted clipboard text, replayed one character per key
    Paste(String),
    /// The user chose an entry from the autocomplete list
    CatalogSelection(CatalogItem),
}

impl EditorEvent {
    /// Short name for logging
    pub fn name(&self) -> String {
        match self {
            EditorEvent::Key(key) => format!("Key({})", key),
            EditorEvent::Paste(text) => format!("Paste({} chars)", text.chars().count()),
            EditorEvent::CatalogSelection(item) => format!("CatalogSelection({})", item.identity),
        }
    }
}
