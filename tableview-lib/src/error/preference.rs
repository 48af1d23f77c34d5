//! Preference persistence error types

/// Errors that can occur while reading or writing persisted preferences.
///
/// Reads never surface these to callers of `PreferenceStore::read`; a
/// failing field degrades to its default. Writes return them so the caller
/// can decide whether to log or report.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The SQLite backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend lock was poisoned by a panicking writer.
    #[error("Backend lock poisoned")]
    Poisoned,
}
