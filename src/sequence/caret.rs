//! Caret position as seen by the rendering collaborator

use serde::Serialize;

/// Token index and character offset inside it.
///
/// Derived from the flat caret on demand; never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaretPosition {
    pub index: usize,
    pub offset: usize,
}

impl CaretPosition {
    pub const fn new(index: usize, offset: usize) -> Self {
        Self { index, offset }
    }
}

impl std::fmt::Display for CaretPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.index, self.offset)
    }
}
