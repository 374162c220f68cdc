//! Semantic key categories understood by the keystroke state machine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a keystroke means to the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCategory {
    /// Browser/editor shortcuts that are swallowed
    Denied,
    Paste,
    HorizontalMove,
    /// Reserved for autocomplete-list navigation
    VerticalMove,
    /// Keys that change nothing (function keys, shift alone)
    Changeless,
    Remove,
    /// Each becomes its own Operator token
    SingleOperation,
    /// Opens a catalog pick at the caret
    Command,
    Cancel,
    Enter,
}

impl KeyCategory {
    /// Every category, in the order the state machine consults them
    pub const ALL: [KeyCategory; 10] = [
        KeyCategory::Denied,
        KeyCategory::Paste,
        KeyCategory::Cancel,
        KeyCategory::VerticalMove,
        KeyCategory::Enter,
        KeyCategory::Remove,
        KeyCategory::Changeless,
        KeyCategory::HorizontalMove,
        KeyCategory::SingleOperation,
        KeyCategory::Command,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            KeyCategory::Denied => "denied",
            KeyCategory::Paste => "paste",
            KeyCategory::HorizontalMove => "horizontal_move",
            KeyCategory::VerticalMove => "vertical_move",
            KeyCategory::Changeless => "changeless",
            KeyCategory::Remove => "remove",
            KeyCategory::SingleOperation => "single_operation",
            KeyCategory::Command => "command",
            KeyCategory::Cancel => "cancel",
            KeyCategory::Enter => "enter",
        }
    }
}

impl fmt::Display for KeyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCategory::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
