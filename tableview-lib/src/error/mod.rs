//! Error types

mod catalog;
mod fetch;
mod preference;

pub use catalog::*;
pub use fetch::*;
pub use preference::*;

/// Top-level error for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Column catalog construction failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Preference persistence failed.
    #[error(transparent)]
    Preference(#[from] PreferenceError),

    /// Remote list fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
