//! Preference backend trait.

use crate::error::PreferenceError;

/// Backend trait for preference storage.
///
/// Implementations handle raw string storage and retrieval, scoped to one
/// application. The [`PreferenceStore`](super::PreferenceStore) wraps this
/// with typed JSON (de)serialization and per-view keys.
///
/// Calls are synchronous: a `get` after a `set` in the same process must
/// observe the new value. Across processes the only guarantee is last
/// write wins.
pub trait PreferenceBackend: Send + Sync {
    /// Get the raw value for a key.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Set the raw value for a key.
    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError>;

    /// Delete a key.
    fn remove(&self, key: &str) -> Result<(), PreferenceError>;

    /// Get all keys matching a prefix.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError>;
}
