//! Core types for key input: Keystroke, Modifiers, KeyCode

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const NUMLOCK: Modifiers = Modifiers(0b1000);

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, numlock: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if numlock {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// NumLock is a lock state rather than a held key, but templates may constrain it
    #[inline]
    pub const fn numlock(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.numlock() {
            parts.push("NumLock");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A logical key value, as reported by the input surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A printable character, case preserved
    Char(char),

    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F24

    // Modifier and lock keys pressed on their own
    Control,
    Shift,
    Alt,
    Meta,
    CapsLock,
    NumLock,
    ScrollLock,
    Pause,
    ContextMenu,
}

impl KeyCode {
    pub const fn is_char(self) -> bool {
        matches!(self, KeyCode::Char(_))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Escape"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Up => write!(f, "ArrowUp"),
            KeyCode::Down => write!(f, "ArrowDown"),
            KeyCode::Left => write!(f, "ArrowLeft"),
            KeyCode::Right => write!(f, "ArrowRight"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Control => write!(f, "Control"),
            KeyCode::Shift => write!(f, "Shift"),
            KeyCode::Alt => write!(f, "Alt"),
            KeyCode::Meta => write!(f, "Meta"),
            KeyCode::CapsLock => write!(f, "CapsLock"),
            KeyCode::NumLock => write!(f, "NumLock"),
            KeyCode::ScrollLock => write!(f, "ScrollLock"),
            KeyCode::Pause => write!(f, "Pause"),
            KeyCode::ContextMenu => write!(f, "ContextMenu"),
        }
    }
}

impl FromStr for KeyCode {
    type Err = String;

    /// Parse a key value name ("a", "ArrowLeft", "Backspace", "F5", "Space")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::Char(c));
        }

        let lower = s.to_ascii_lowercase();
        let key = match lower.as_str() {
            "space" | "spacebar" => KeyCode::Char(' '),
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" | "back" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,
            "control" | "ctrl" => KeyCode::Control,
            "shift" => KeyCode::Shift,
            "alt" | "option" => KeyCode::Alt,
            "meta" | "os" | "super" => KeyCode::Meta,
            "capslock" => KeyCode::CapsLock,
            "numlock" => KeyCode::NumLock,
            "scrolllock" => KeyCode::ScrollLock,
            "pause" => KeyCode::Pause,
            "contextmenu" => KeyCode::ContextMenu,
            other => {
                if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    if (1..=24).contains(&n) {
                        return Ok(KeyCode::F(n));
                    }
                }
                return Err(format!("Unknown key: {}", s));
            }
        };
        Ok(key)
    }
}

/// A single keystroke: a key with the live modifier state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Unmodified character keystroke
    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Text this keystroke types, if it is a printable character
    pub fn text(&self) -> Option<String> {
        match self.key {
            KeyCode::Char(c) => Some(c.to_string()),
            _ => None,
        }
    }

    /// Synthetic keystrokes for pasted text, one per character
    pub fn from_text(text: &str) -> Vec<Keystroke> {
        text.chars()
            .filter(|c| !c.is_control())
            .map(Keystroke::char)
            .collect()
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+{}", self.mods, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
        assert!(!mods.numlock());
    }

    #[test]
    fn test_modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn test_modifiers_new() {
        let mods = Modifiers::new(true, false, true, false);
        assert!(mods.ctrl());
        assert!(!mods.shift());
        assert!(mods.alt());
        assert!(!mods.numlock());
    }

    #[test]
    fn test_keycode_from_str() {
        assert_eq!("a".parse::<KeyCode>(), Ok(KeyCode::Char('a')));
        assert_eq!("A".parse::<KeyCode>(), Ok(KeyCode::Char('A')));
        assert_eq!("@".parse::<KeyCode>(), Ok(KeyCode::Char('@')));
        assert_eq!("ArrowLeft".parse::<KeyCode>(), Ok(KeyCode::Left));
        assert_eq!("Space".parse::<KeyCode>(), Ok(KeyCode::Char(' ')));
        assert_eq!("F12".parse::<KeyCode>(), Ok(KeyCode::F(12)));
        assert!("F99".parse::<KeyCode>().is_err());
        assert!("Bogus".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_keycode_display_round_trips_named_keys() {
        for key in [KeyCode::Left, KeyCode::PageDown, KeyCode::Backspace, KeyCode::F(3)] {
            assert_eq!(key.to_string().parse::<KeyCode>(), Ok(key));
        }
    }

    #[test]
    fn test_keystroke_text() {
        assert_eq!(Keystroke::char('x').text().as_deref(), Some("x"));
        assert_eq!(Keystroke::key(KeyCode::Enter).text(), None);
    }

    #[test]
    fn test_keystroke_from_text_skips_control_chars() {
        let strokes = Keystroke::from_text("a+\nb");
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes[1], Keystroke::char('+'));
    }

    #[test]
    fn test_keystroke_display() {
        let stroke = Keystroke::new(KeyCode::Char('b'), Modifiers::CTRL);
        assert_eq!(stroke.to_string(), "Ctrl+b");
    }
}
