//! KeyPattern - a key template with per-modifier constraints

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{KeyCode, Keystroke};

/// How a template constrains one modifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyUsage {
    /// Don't care
    #[default]
    Ignored,
    /// Modifier must be held
    On,
    /// Modifier must not be held
    Off,
}

impl KeyUsage {
    #[inline]
    pub fn accepts(self, held: bool) -> bool {
        match self {
            KeyUsage::Ignored => true,
            KeyUsage::On => held,
            KeyUsage::Off => !held,
        }
    }
}

/// A key value plus modifier constraints.
///
/// A keystroke matches when the key values are equal and every constrained
/// modifier has exactly the required state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPattern {
    pub key: KeyCode,
    pub ctrl: KeyUsage,
    pub alt: KeyUsage,
    pub shift: KeyUsage,
    pub numlock: KeyUsage,
}

impl KeyPattern {
    /// Template matching the key regardless of modifiers
    pub const fn new(key: KeyCode) -> Self {
        Self {
            key,
            ctrl: KeyUsage::Ignored,
            alt: KeyUsage::Ignored,
            shift: KeyUsage::Ignored,
            numlock: KeyUsage::Ignored,
        }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub const fn ctrl(mut self, usage: KeyUsage) -> Self {
        self.ctrl = usage;
        self
    }

    pub const fn alt(mut self, usage: KeyUsage) -> Self {
        self.alt = usage;
        self
    }

    pub const fn shift(mut self, usage: KeyUsage) -> Self {
        self.shift = usage;
        self
    }

    pub const fn numlock(mut self, usage: KeyUsage) -> Self {
        self.numlock = usage;
        self
    }

    pub fn matches(&self, keystroke: &Keystroke) -> bool {
        self.key == keystroke.key
            && self.ctrl.accepts(keystroke.mods.ctrl())
            && self.alt.accepts(keystroke.mods.alt())
            && self.shift.accepts(keystroke.mods.shift())
            && self.numlock.accepts(keystroke.mods.numlock())
    }
}

impl fmt::Display for KeyPattern {
    /// Same notation the config parser reads: `ctrl+!alt+b`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints = [
            ("ctrl", self.ctrl),
            ("alt", self.alt),
            ("shift", self.shift),
            ("numlock", self.numlock),
        ];
        for (name, usage) in constraints {
            match usage {
                KeyUsage::Ignored => {}
                KeyUsage::On => write!(f, "{}+", name)?,
                KeyUsage::Off => write!(f, "!{}+", name)?,
            }
        }
        write!(f, "{}", self.key)
    }
}
