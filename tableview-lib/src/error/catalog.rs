//! Catalog error types

/// Errors raised while assembling a column catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two descriptors share the same column id.
    #[error("Duplicate column id: {0}")]
    DuplicateId(String),
}
