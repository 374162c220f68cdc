//! Token model for the structured expression
//!
//! - [`ExpressionNode`]: a single token with its editable text, catalog binding,
//!   chain membership, deletion mark and edit-status snapshot
//! - [`NodeGenerator`]: factory for placeholders, operators and function scaffolds
//! - [`DisplayNode`]: read-only render record

pub mod display;
pub mod generator;
pub mod node;
pub mod types;

pub use display::DisplayNode;
pub use generator::NodeGenerator;
pub use node::{ExpressionNode, NodeContent};
pub use types::{Argument, NodeId, NodeKind, ValueType};
