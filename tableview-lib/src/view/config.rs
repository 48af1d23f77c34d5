//! View configuration

use std::sync::Arc;

use crate::columns::SyntheticColumn;
use crate::prefs::PreferenceBackend;
use crate::prefs::PreferenceStore;
use crate::query::QueryConfig;

/// Configuration for one table view.
///
/// # Example
///
/// ```
/// use tableview_lib::columns::SyntheticColumn;
/// use tableview_lib::view::ViewConfig;
///
/// let config = ViewConfig::new("prompts")
///     .with_default_selected(["version_count", "last_updated_at", "description"])
///     .with_trailing(vec![SyntheticColumn::actions()])
///     .with_no_data_message("There are no prompts yet");
/// ```
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Preference namespace, e.g. `experiments`.
    pub namespace: String,

    /// Columns shown before the user has chosen any.
    pub default_selected: Vec<String>,

    /// Overwrite malformed stored preferences with defaults on read.
    ///
    /// Default: true
    pub heal_corrupt_preferences: bool,

    /// Synthetic columns before the data columns.
    ///
    /// Default: the row selector
    pub leading: Vec<SyntheticColumn>,

    /// Synthetic columns after the data columns.
    ///
    /// Default: none
    pub trailing: Vec<SyntheticColumn>,

    /// Shown when an unfiltered query returns no rows.
    pub no_data_message: String,

    /// Shown when a search returns no rows.
    pub no_results_message: String,

    pub query: QueryConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            default_selected: Vec::new(),
            heal_corrupt_preferences: true,
            leading: vec![SyntheticColumn::selector()],
            trailing: Vec::new(),
            no_data_message: "There are no records yet".to_string(),
            no_results_message: "No search results".to_string(),
            query: QueryConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Creates a config with default values for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Sets the default column selection.
    pub fn with_default_selected<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_selected = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether corrupt preferences are rewritten.
    pub fn with_heal_corrupt_preferences(mut self, heal: bool) -> Self {
        self.heal_corrupt_preferences = heal;
        self
    }

    /// Sets the leading synthetic columns.
    pub fn with_leading(mut self, columns: Vec<SyntheticColumn>) -> Self {
        self.leading = columns;
        self
    }

    /// Sets the trailing synthetic columns.
    pub fn with_trailing(mut self, columns: Vec<SyntheticColumn>) -> Self {
        self.trailing = columns;
        self
    }

    /// Sets the empty-listing message.
    pub fn with_no_data_message(mut self, message: impl Into<String>) -> Self {
        self.no_data_message = message.into();
        self
    }

    /// Sets the empty-search message.
    pub fn with_no_results_message(mut self, message: impl Into<String>) -> Self {
        self.no_results_message = message.into();
        self
    }

    /// Sets the query config.
    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// Builds the preference store this view reads and writes.
    pub fn preference_store(&self, backend: Arc<dyn PreferenceBackend>) -> PreferenceStore {
        PreferenceStore::new(backend, self.namespace.clone())
            .with_default_selected(self.default_selected.iter().cloned())
            .with_heal_corrupt(self.heal_corrupt_preferences)
    }

    /// Returns `true` if `id` belongs to a synthetic column.
    pub fn is_synthetic(&self, id: &str) -> bool {
        self.leading.iter().chain(self.trailing.iter()).any(|column| column.id == id)
    }
}
