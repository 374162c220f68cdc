//! Sequence manager: ordered tokens, caret arithmetic, chain rules and the
//! active-token handle

mod caret;
pub mod literal;
#[allow(clippy::module_inception)]
mod sequence;

pub use caret::CaretPosition;
pub use sequence::Sequence;
