//! Column catalog

use std::collections::HashSet;
use std::fmt;

use crate::error::CatalogError;

use super::ColumnDescriptor;

/// Every column a view can show, fixed when the view is composed.
///
/// `columns` are subject to the user's selection and order preferences.
/// `pinned` columns are always shown ahead of them in declaration order and
/// only honor width preferences.
pub struct ColumnCatalog<R> {
    pinned: Vec<ColumnDescriptor<R>>,
    columns: Vec<ColumnDescriptor<R>>,
}

impl<R> ColumnCatalog<R> {
    /// Creates a catalog of selectable columns.
    ///
    /// Fails if two descriptors share an id.
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Result<Self, CatalogError> {
        Self::with_pinned(Vec::new(), columns)
    }

    /// Creates a catalog with always-visible pinned columns.
    ///
    /// Ids must be unique across both lists.
    pub fn with_pinned(
        pinned: Vec<ColumnDescriptor<R>>,
        columns: Vec<ColumnDescriptor<R>>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for column in pinned.iter().chain(columns.iter()) {
            if !seen.insert(column.id.as_str()) {
                return Err(CatalogError::DuplicateId(column.id.clone()));
            }
        }
        Ok(Self { pinned, columns })
    }

    /// Selectable columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    /// Pinned columns in declaration order.
    pub fn pinned(&self) -> &[ColumnDescriptor<R>] {
        &self.pinned
    }

    /// Finds a descriptor (pinned or selectable) by id.
    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor<R>> {
        self.pinned
            .iter()
            .chain(self.columns.iter())
            .find(|column| column.id == id)
    }

    /// Returns `true` if `id` names a selectable column.
    pub fn contains(&self, id: &str) -> bool {
        self.columns.iter().any(|column| column.id == id)
    }

    /// Selectable column ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.id.as_str())
    }

    /// Number of selectable columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no selectable columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<R> Clone for ColumnCatalog<R> {
    fn clone(&self) -> Self {
        Self {
            pinned: self.pinned.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnCatalog<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCatalog")
            .field("pinned", &self.pinned)
            .field("columns", &self.columns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    fn col(id: &str) -> ColumnDescriptor<()> {
        ColumnDescriptor::new(id, id, ColumnType::String)
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ColumnCatalog::new(vec![col("a"), col("b"), col("a")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_duplicate_across_pinned_rejected() {
        let err = ColumnCatalog::with_pinned(vec![col("name")], vec![col("name")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("name".to_string()));
    }

    #[test]
    fn test_lookup() {
        let catalog = ColumnCatalog::with_pinned(vec![col("name")], vec![col("id"), col("created_at")]).unwrap();
        assert!(catalog.get("name").is_some());
        assert!(catalog.contains("created_at"));
        assert!(!catalog.contains("name"));
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["id", "created_at"]);
    }
}
