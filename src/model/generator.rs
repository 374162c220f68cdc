//! Token factory: placeholders, operators, columns and function scaffolds

use super::node::{ExpressionNode, NodeContent};
use super::types::{Argument, NodeKind, ValueType};

pub const BRACKET_OPEN: &str = "(";
pub const BRACKET_CLOSE: &str = ")";
pub const COMMA: &str = ",";
pub const DOT: &str = ".";

/// Builds well-formed tokens and token groups
pub struct NodeGenerator;

impl NodeGenerator {
    /// Empty unclassified token
    pub fn empty() -> ExpressionNode {
        ExpressionNode::new()
    }

    /// Empty token already in edit status, ready to drive a catalog pick
    pub fn placeholder() -> ExpressionNode {
        let mut node = ExpressionNode::new();
        node.enter_edit_status();
        node
    }

    pub fn operator(operation: &str) -> ExpressionNode {
        ExpressionNode::with_content(NodeContent {
            kind: NodeKind::Operator,
            text: operation.to_string(),
            ..NodeContent::default()
        })
    }

    pub fn column(caption: &str, schema_ref: &str, value_type: ValueType) -> ExpressionNode {
        ExpressionNode::with_content(NodeContent {
            kind: NodeKind::Column,
            text: caption.to_string(),
            schema_ref: Some(schema_ref.to_string()),
            value_type,
            ..NodeContent::default()
        })
    }

    pub fn function(caption: &str, value_type: ValueType, arguments: Vec<Argument>) -> ExpressionNode {
        ExpressionNode::with_content(NodeContent {
            kind: NodeKind::Function,
            text: caption.to_string(),
            value_type,
            arguments,
            ..NodeContent::default()
        })
    }

    /// Operators following a function head: `(`, one `,` per argument gap, `)`.
    ///
    /// The opening bracket carries `chain_key` so the head and its bracket stay
    /// atomic; the argument slots stay open for typing.
    pub fn argument_scaffold(argument_count: usize, chain_key: &str) -> Vec<ExpressionNode> {
        let mut scaffold = Vec::with_capacity(argument_count.max(1) + 1);
        let mut open = Self::operator(BRACKET_OPEN);
        open.set_chain_key(chain_key);
        scaffold.push(open);
        for _ in 1..argument_count {
            scaffold.push(Self::operator(COMMA));
        }
        scaffold.push(Self::operator(BRACKET_CLOSE));
        scaffold
    }

    /// Function head followed by its argument scaffold
    pub fn function_group(
        caption: &str,
        value_type: ValueType,
        arguments: Vec<Argument>,
        chain_key: &str,
    ) -> Vec<ExpressionNode> {
        let count = arguments.len();
        let mut head = Self::function(caption, value_type, arguments);
        head.set_chain_key(chain_key);
        let mut group = vec![head];
        group.extend(Self::argument_scaffold(count, chain_key));
        group
    }
}
