//! In-memory catalog, loadable from a JSON array of items

use std::path::Path;

use super::{CatalogError, CatalogItem, CatalogRequest, CatalogSource};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::IoError(e.to_string()))?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded catalog from {} ({} items)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entry by identity
    pub fn find(&self, identity: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.identity == identity)
    }
}

impl CatalogSource for StaticCatalog {
    fn search(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self
            .items
            .iter()
            .filter(|item| request.accepts(item))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Filter;
    use crate::model::NodeKind;

    const CATALOG: &str = r#"[
        {"identity": "col-account", "title": "Account", "code": "Account",
         "kind": "Column", "value_type": "Lookup",
         "schema_ref": "Contact", "reference_schema_ref": "Account"},
        {"identity": "col-name", "title": "Name", "code": "Name",
         "kind": "Column", "value_type": "Text", "schema_ref": "Account"},
        {"identity": "fn-datepart", "title": "DATEPART", "code": "DATEPART",
         "kind": "Function", "value_type": "Integer",
         "arguments": [
            {"name": "from", "value_type": "DateTime"},
            {"name": "to", "value_type": "DateTime"}
         ]}
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        let datepart = catalog.find("fn-datepart").unwrap();
        assert_eq!(datepart.kind, NodeKind::Function);
        assert_eq!(datepart.arguments.len(), 2);
        assert!(datepart.arguments[0].required);
    }

    #[test]
    fn test_from_json_error() {
        assert!(matches!(
            StaticCatalog::from_json("{not json"),
            Err(CatalogError::ParseError(_))
        ));
    }

    #[test]
    fn test_search_root() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let found = catalog
            .search(&CatalogRequest::new("", Filter::root("Contact")))
            .unwrap();
        let titles: Vec<_> = found.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Account", "DATEPART"]);
    }

    #[test]
    fn test_search_prefix_is_case_insensitive() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let found = catalog
            .search(&CatalogRequest::new("acc", Filter::root("Contact")))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].identity, "col-account");
    }

    #[test]
    fn test_search_drill_down() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let found = catalog
            .search(&CatalogRequest::new("", Filter::drill_down("Account")))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Name");
    }

    #[test]
    fn test_load_missing_file() {
        let result = StaticCatalog::load(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogError::IoError(_))));
    }
}
