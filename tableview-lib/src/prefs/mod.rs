//! Persisted per-view column preferences.
//!
//! Each view namespace owns three independent keys in the backend, one per
//! preference field, so writers touching different fields never clobber
//! each other:
//!
//! | Key | Payload |
//! |-----|---------|
//! | `{ns}-selected-columns` | JSON array of column ids |
//! | `{ns}-columns-order` | JSON array of column ids |
//! | `{ns}-columns-width` | JSON object, column id to pixels |

mod backend;
mod memory;
mod sqlite;

pub use backend::PreferenceBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::error::PreferenceError;

/// The user-chosen subset, order and widths of a view's columns.
///
/// Any field may reference ids that no longer exist in the catalog; the
/// materializer drops those silently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPreferences {
    pub selected_column_ids: BTreeSet<String>,
    /// Explicit display order. Selected ids missing here follow in
    /// catalog order.
    pub column_order: Vec<String>,
    /// Widths in pixels, kept even for hidden columns.
    pub column_widths: BTreeMap<String, u32>,
}

impl ViewPreferences {
    /// Preferences with the given columns selected and nothing else set.
    pub fn with_selected<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_column_ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns `true` if the column is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_column_ids.contains(id)
    }
}

/// Typed, per-view access to persisted preferences.
///
/// Reads never fail: a missing or malformed field falls back to its
/// default (and, with healing on, the default is written back). Writes are
/// per field and go straight to the backend.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tableview_lib::prefs::{MemoryBackend, PreferenceStore};
///
/// let store = PreferenceStore::new(Arc::new(MemoryBackend::new()), "experiments")
///     .with_default_selected(["name", "created_at"]);
///
/// store.write_width("created_at", 220).unwrap();
/// let prefs = store.read();
/// assert!(prefs.is_selected("name"));
/// assert_eq!(prefs.column_widths["created_at"], 220);
/// ```
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
    namespace: String,
    default_selected: BTreeSet<String>,
    heal_corrupt: bool,
}

impl PreferenceStore {
    /// Create a store for one view namespace.
    pub fn new(backend: Arc<dyn PreferenceBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            default_selected: BTreeSet::new(),
            heal_corrupt: true,
        }
    }

    /// Sets the selection used when nothing valid is stored.
    pub fn with_default_selected<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_selected = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether malformed payloads are overwritten with defaults on read.
    pub fn with_heal_corrupt(mut self, heal: bool) -> Self {
        self.heal_corrupt = heal;
        self
    }

    /// The view namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Preferences used when nothing valid is stored.
    pub fn defaults(&self) -> ViewPreferences {
        ViewPreferences {
            selected_column_ids: self.default_selected.clone(),
            ..ViewPreferences::default()
        }
    }

    /// Read all three fields, each independently defaulted.
    pub fn read(&self) -> ViewPreferences {
        ViewPreferences {
            selected_column_ids: self.read_field(&self.selected_key(), || self.default_selected.clone()),
            column_order: self.read_field(&self.order_key(), Vec::new),
            column_widths: self.read_field(&self.widths_key(), BTreeMap::new),
        }
    }

    /// Replace the selected column set.
    pub fn write_selected<I, S>(&self, ids: I) -> Result<(), PreferenceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        self.write_field(&self.selected_key(), &ids)
    }

    /// Replace the explicit column order.
    pub fn write_order(&self, order: &[String]) -> Result<(), PreferenceError> {
        self.write_field(&self.order_key(), order)
    }

    /// Set one column's width, keeping every other stored width.
    ///
    /// A failed backend read aborts the write; only a malformed stored map
    /// is replaced.
    pub fn write_width(&self, id: &str, px: u32) -> Result<(), PreferenceError> {
        let key = self.widths_key();
        let mut widths: BTreeMap<String, u32> = match self.backend.get(&key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Replacing malformed preference {}: {}", key, e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        widths.insert(id.to_string(), px);
        self.write_field(&key, &widths)
    }

    /// Replace the whole width map.
    pub fn write_widths(&self, widths: &BTreeMap<String, u32>) -> Result<(), PreferenceError> {
        self.write_field(&self.widths_key(), widths)
    }

    /// Remove every stored field so the next read yields defaults.
    pub fn reset(&self) -> Result<(), PreferenceError> {
        self.backend.remove(&self.selected_key())?;
        self.backend.remove(&self.order_key())?;
        self.backend.remove(&self.widths_key())
    }

    fn selected_key(&self) -> String {
        format!("{}-selected-columns", self.namespace)
    }

    fn order_key(&self) -> String {
        format!("{}-columns-order", self.namespace)
    }

    fn widths_key(&self) -> String {
        format!("{}-columns-width", self.namespace)
    }

    fn read_field<T>(&self, key: &str, default: impl FnOnce() -> T) -> T
    where
        T: DeserializeOwned + Serialize,
    {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default(),
            Err(e) => {
                log::warn!("Failed to read preference {}: {}", key, e);
                return default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding malformed preference {}: {}", key, e);
                let value = default();
                if self.heal_corrupt
                    && let Err(e) = self.write_field(key, &value)
                {
                    log::warn!("Failed to rewrite preference {}: {}", key, e);
                }
                value
            }
        }
    }

    fn write_field<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw)
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("namespace", &self.namespace)
            .field("default_selected", &self.default_selected)
            .field("heal_corrupt", &self.heal_corrupt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<MemoryBackend>, PreferenceStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = PreferenceStore::new(backend.clone(), "experiments")
            .with_default_selected(["name", "dataset", "created_at"]);
        (backend, store)
    }

    #[test]
    fn test_defaults_when_unset() {
        let (_, store) = store();
        let prefs = store.read();
        assert_eq!(prefs, ViewPreferences::with_selected(["name", "dataset", "created_at"]));
    }

    #[test]
    fn test_width_survives_deselect() {
        let (_, store) = store();
        store.write_width("B", 220).unwrap();
        store.write_selected(Vec::<String>::new()).unwrap();
        assert_eq!(store.read().column_widths.get("B"), Some(&220));
        store.write_selected(["B"]).unwrap();
        assert_eq!(store.read().column_widths.get("B"), Some(&220));
    }

    #[test]
    fn test_write_width_keeps_other_widths() {
        let (_, store) = store();
        store.write_width("A", 100).unwrap();
        store.write_width("B", 220).unwrap();
        store.write_width("A", 150).unwrap();
        let widths = store.read().column_widths;
        assert_eq!(widths.get("A"), Some(&150));
        assert_eq!(widths.get("B"), Some(&220));
    }

    /// Memory backend whose reads can be made to fail.
    #[derive(Default)]
    struct FailingReads {
        inner: MemoryBackend,
        failing: std::sync::atomic::AtomicBool,
    }

    impl PreferenceBackend for FailingReads {
        fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(PreferenceError::Poisoned);
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), PreferenceError> {
            self.inner.remove(key)
        }

        fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError> {
            self.inner.keys_with_prefix(prefix)
        }
    }

    #[test]
    fn test_write_width_fails_when_read_fails() {
        let backend = Arc::new(FailingReads::default());
        let store = PreferenceStore::new(backend.clone(), "experiments");
        store.write_width("A", 111).unwrap();

        backend.failing.store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(matches!(store.write_width("B", 222), Err(PreferenceError::Poisoned)));
        backend.failing.store(false, std::sync::atomic::Ordering::SeqCst);

        let widths = store.read().column_widths;
        assert_eq!(widths.get("A"), Some(&111));
        assert_eq!(widths.get("B"), None);
    }

    #[test]
    fn test_write_width_replaces_malformed_map() {
        let (backend, store) = store();
        backend.set("experiments-columns-width", "{not json".to_string()).unwrap();
        store.write_width("B", 220).unwrap();
        assert_eq!(
            backend.get("experiments-columns-width").unwrap().as_deref(),
            Some(r#"{"B":220}"#)
        );
    }

    #[test]
    fn test_fields_are_independent() {
        let (_, store) = store();
        store.write_order(&["b".to_string(), "a".to_string()]).unwrap();
        store.write_selected(["a"]).unwrap();
        let prefs = store.read();
        assert_eq!(prefs.column_order, vec!["b", "a"]);
        assert_eq!(prefs.selected_column_ids, BTreeSet::from(["a".to_string()]));
        assert!(prefs.column_widths.is_empty());
    }

    #[test]
    fn test_malformed_field_degrades_alone() {
        let (backend, store) = store();
        store.write_order(&["b".to_string()]).unwrap();
        backend.set("experiments-columns-width", "{not json".to_string()).unwrap();
        backend.set("experiments-selected-columns", r#"{"a":1}"#.to_string()).unwrap();

        let prefs = store.read();
        assert!(prefs.column_widths.is_empty());
        assert!(prefs.is_selected("name"));
        assert_eq!(prefs.column_order, vec!["b"]);
    }

    #[test]
    fn test_malformed_payload_is_healed() {
        let (backend, store) = store();
        backend.set("experiments-columns-width", r#"{"a":-5}"#.to_string()).unwrap();
        store.read();
        assert_eq!(backend.get("experiments-columns-width").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_heal_disabled_leaves_payload() {
        let (backend, store) = store();
        let store = store.with_heal_corrupt(false);
        backend.set("experiments-columns-order", "oops".to_string()).unwrap();
        assert!(store.read().column_order.is_empty());
        assert_eq!(backend.get("experiments-columns-order").unwrap().as_deref(), Some("oops"));
    }

    #[test]
    fn test_two_stores_last_write_wins_per_field() {
        let backend: Arc<dyn PreferenceBackend> = Arc::new(MemoryBackend::new());
        let left = PreferenceStore::new(backend.clone(), "traces");
        let right = PreferenceStore::new(backend, "traces");

        left.write_order(&["x".to_string()]).unwrap();
        right.write_width("x", 300).unwrap();
        right.write_order(&["y".to_string()]).unwrap();

        let prefs = left.read();
        assert_eq!(prefs.column_order, vec!["y"]);
        assert_eq!(prefs.column_widths.get("x"), Some(&300));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (backend, store) = store();
        store.write_selected(["id"]).unwrap();
        store.write_width("id", 80).unwrap();
        store.reset().unwrap();
        assert_eq!(store.read(), store.defaults());
        assert!(backend.keys_with_prefix("experiments-").unwrap().is_empty());
    }
}
