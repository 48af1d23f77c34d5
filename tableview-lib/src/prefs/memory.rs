//! In-memory preference backend using DashMap

use dashmap::DashMap;

use super::PreferenceBackend;
use crate::error::PreferenceError;

/// An in-memory backend backed by a concurrent hash map.
///
/// Data is lost when the process exits. Useful for tests and for views
/// that should not remember anything.
///
/// # Example
///
/// ```
/// use tableview_lib::prefs::{MemoryBackend, PreferenceBackend};
///
/// let backend = MemoryBackend::new();
/// backend.set("experiments-columns-order", "[]".to_string()).unwrap();
/// assert_eq!(backend.get("experiments-columns-order").unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: DashMap<String, String>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.store.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError> {
        let mut keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
