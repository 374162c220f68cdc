//! Read-only render records handed to the rendering collaborator

use serde::Serialize;

use super::node::ExpressionNode;
use super::types::{NodeKind, ValueType};

/// Render record for a single token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub text: String,
    pub kind: NodeKind,
    pub value_type: ValueType,
    pub marked_for_deletion: bool,
    pub is_active: bool,
}

impl DisplayNode {
    pub fn from_node(node: &ExpressionNode, is_active: bool) -> Self {
        Self {
            text: node.text().to_string(),
            kind: node.kind(),
            value_type: node.value_type(),
            marked_for_deletion: node.marked_for_deletion,
            is_active,
        }
    }

    /// CSS-style class describing how the token should be painted
    pub fn style_class(&self) -> String {
        let base = match self.kind {
            NodeKind::Column => "dvt-column",
            NodeKind::Function | NodeKind::Variable => "dvt-function",
            _ => match self.value_type {
                ValueType::Float | ValueType::Integer => "dvt-number",
                ValueType::Text => "dvt-text",
                _ => "dvt-undefined",
            },
        };
        if self.marked_for_deletion {
            format!("{} marked-to-delete", base)
        } else {
            base.to_string()
        }
    }
}
