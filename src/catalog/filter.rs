//! Catalog request filters
//!
//! A filter is a tree of property conditions combined with And/Or groups.
//! The engine builds two canonical shapes: drill-down into a referenced schema
//! and the root search.

use serde::{Deserialize, Serialize};

use crate::keymap::Keystroke;
use crate::model::NodeKind;

use super::CatalogItem;

/// Catalog item property a condition compares
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Identity,
    Title,
    Code,
    Kind,
    ValueType,
    SchemaRef,
    ReferenceSchemaRef,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparator {
    Equals,
    /// Case-insensitive prefix match
    StartsWith,
    /// Case-insensitive substring match
    Contains,
}

impl Comparator {
    pub fn compare(self, actual: &str, expected: &str) -> bool {
        match self {
            Comparator::Equals => actual == expected,
            Comparator::StartsWith => actual
                .to_lowercase()
                .starts_with(&expected.to_lowercase()),
            Comparator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
        }
    }
}

/// Filter tree over catalog items
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    Condition {
        property: Property,
        comparator: Comparator,
        value: String,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn condition(property: Property, comparator: Comparator, value: impl Into<String>) -> Self {
        Filter::Condition {
            property,
            comparator,
            value: value.into(),
        }
    }

    pub fn equals(property: Property, value: impl Into<String>) -> Self {
        Self::condition(property, Comparator::Equals, value)
    }

    pub fn kind_is(kind: NodeKind) -> Self {
        Self::equals(Property::Kind, kind.to_string())
    }

    /// Columns of the schema a lookup column references
    pub fn drill_down(reference_schema: &str) -> Self {
        Filter::And(vec![
            Self::equals(Property::SchemaRef, reference_schema),
            Self::kind_is(NodeKind::Column),
        ])
    }

    /// Root columns plus every function and system setting
    pub fn root(root_schema: &str) -> Self {
        Filter::Or(vec![
            Filter::And(vec![
                Self::equals(Property::SchemaRef, root_schema),
                Self::kind_is(NodeKind::Column),
            ]),
            Self::kind_is(NodeKind::Function),
            Self::kind_is(NodeKind::SystemSetting),
        ])
    }

    /// Evaluate against an item; missing properties never match.
    ///
    /// An empty And is true, an empty Or is false.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            Filter::Condition {
                property,
                comparator,
                value,
            } => item
                .property(*property)
                .is_some_and(|actual| comparator.compare(&actual, value)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(item)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(item)),
        }
    }
}

/// What the catalog collaborator should search for
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogRequest {
    /// Text typed into the active placeholder so far
    pub title_prefix: String,
    pub filter: Filter,
    /// Last key, so the list can react to navigation keys
    pub last_key: Option<Keystroke>,
}

impl CatalogRequest {
    pub fn new(title_prefix: impl Into<String>, filter: Filter) -> Self {
        Self {
            title_prefix: title_prefix.into(),
            filter,
            last_key: None,
        }
    }

    pub fn with_last_key(mut self, key: Option<Keystroke>) -> Self {
        self.last_key = key;
        self
    }

    /// Title prefix and filter both accept the item
    pub fn accepts(&self, item: &CatalogItem) -> bool {
        (self.title_prefix.is_empty()
            || Comparator::StartsWith.compare(&item.title, &self.title_prefix))
            && self.filter.matches(item)
    }
}
