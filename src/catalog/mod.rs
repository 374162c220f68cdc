//! Catalog collaborator: the searchable list of columns, functions and
//! settings a placeholder can be bound to

mod filter;
mod static_catalog;

use serde::{Deserialize, Serialize};

use crate::model::{Argument, NodeKind, ValueType};

pub use filter::{CatalogRequest, Comparator, Filter, Property};
pub use static_catalog::StaticCatalog;

/// A catalog entry that can be applied to a token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub identity: String,
    pub title: String,
    #[serde(default)]
    pub code: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub schema_ref: Option<String>,
    #[serde(default)]
    pub reference_schema_ref: Option<String>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

impl CatalogItem {
    /// String form of a property, as compared by filters
    pub fn property(&self, property: Property) -> Option<String> {
        match property {
            Property::Identity => Some(self.identity.clone()),
            Property::Title => Some(self.title.clone()),
            Property::Code => Some(self.code.clone()),
            Property::Kind => Some(self.kind.to_string()),
            Property::ValueType => Some(self.value_type.to_string()),
            Property::SchemaRef => self.schema_ref.clone(),
            Property::ReferenceSchemaRef => self.reference_schema_ref.clone(),
        }
    }
}

/// Source of catalog entries.
///
/// Called synchronously after a batch has been applied; an error or an empty
/// list leaves the autocomplete list empty.
pub trait CatalogSource {
    fn search(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Errors raised by catalog sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    IoError(String),
    ParseError(String),
    Unavailable(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::IoError(e) => write!(f, "IO error: {}", e),
            CatalogError::ParseError(e) => write!(f, "Parse error: {}", e),
            CatalogError::Unavailable(e) => write!(f, "Catalog unavailable: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}
