//! Keystroke processing
//!
//! - [`KeyProcessor`]: the state machine turning keys and catalog picks into
//!   sequence edits
//! - [`Session`]: serial event queue that publishes a [`ProcessResult`] per batch
//! - [`ExtendSource`]: optional supplier of drill-down continuations

mod edit;
mod extend;
mod key_processor;
mod messages;
mod pick;
mod result;
mod session;

pub use extend::{ExtendRequest, ExtendSource};
pub use key_processor::KeyProcessor;
pub use messages::EditorEvent;
pub use result::ProcessResult;
pub use session::Session;
