//! Core value types for expression tokens: kinds, value types, arguments, handles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle to a token inside a [`Sequence`](crate::sequence::Sequence).
///
/// Handles are assigned on insertion and never reused within one sequence, so a
/// stale handle simply fails to resolve instead of pointing at another token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Handle of a token that has not been inserted yet
    pub const DETACHED: NodeId = NodeId(0);

    #[inline]
    pub const fn is_detached(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a token represents in the expression
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Fresh placeholder or text not yet classified
    #[default]
    Unset,
    /// Literal value (number, quoted text)
    Constant,
    /// Single-character operator, bracket or delimiter
    Operator,
    /// Reference to a schema column
    Column,
    /// Function call head
    Function,
    Variable,
    SystemSetting,
    SystemValue,
}

impl NodeKind {
    /// Kinds whose text is assigned by the catalog or the factory
    #[inline]
    pub const fn is_structural(self) -> bool {
        matches!(self, NodeKind::Operator | NodeKind::Column | NodeKind::Function)
    }

    /// Catalog-bound kinds that are removed in two stages
    #[inline]
    pub const fn is_catalog_bound(self) -> bool {
        matches!(
            self,
            NodeKind::Column
                | NodeKind::Function
                | NodeKind::Variable
                | NodeKind::SystemSetting
                | NodeKind::SystemValue
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Unset => "Unset",
            NodeKind::Constant => "Constant",
            NodeKind::Operator => "Operator",
            NodeKind::Column => "Column",
            NodeKind::Function => "Function",
            NodeKind::Variable => "Variable",
            NodeKind::SystemSetting => "SystemSetting",
            NodeKind::SystemValue => "SystemValue",
        };
        f.write_str(name)
    }
}

/// Scalar type tag carried by a token
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[default]
    Unset,
    Guid,
    Text,
    Integer,
    Float,
    DateTime,
    Date,
    Time,
    Lookup,
    Boolean,
}

impl ValueType {
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Float)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Unset => "Unset",
            ValueType::Guid => "Guid",
            ValueType::Text => "Text",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::DateTime => "DateTime",
            ValueType::Date => "Date",
            ValueType::Time => "Time",
            ValueType::Lookup => "Lookup",
            ValueType::Boolean => "Boolean",
        };
        f.write_str(name)
    }
}

/// A declared argument of a function token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value_type: ValueType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

fn default_required() -> bool {
    true
}

impl Argument {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: true,
            description: String::new(),
        }
    }

    pub fn optional(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::new(name, value_type)
        }
    }
}
