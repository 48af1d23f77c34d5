//! Column chooser edits.
//!
//! Pure helpers that turn a user's column-picker gesture into the next
//! preference value. The caller persists the result.

use std::collections::BTreeSet;

use crate::model::ColumnCatalog;
use crate::prefs::ViewPreferences;

use super::ordered_columns;

/// One row in a column chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserEntry {
    pub id: String,
    pub label: String,
    pub visible: bool,
}

/// Every selectable column in display order, with its visibility.
pub fn chooser_entries<R>(catalog: &ColumnCatalog<R>, prefs: &ViewPreferences) -> Vec<ChooserEntry> {
    ordered_columns(catalog, &prefs.column_order)
        .into_iter()
        .map(|column| ChooserEntry {
            id: column.id.clone(),
            label: column.label.clone(),
            visible: prefs.is_selected(&column.id),
        })
        .collect()
}

/// Flip one column's visibility.
///
/// Stale ids already in the set are kept; the materializer ignores them.
pub fn toggle_column(selected: &BTreeSet<String>, id: &str) -> BTreeSet<String> {
    let mut next = selected.clone();
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}

/// Move a column to `to_index` in the full display order.
///
/// Returns an explicit order over every selectable catalog column, with
/// stale ids dropped. An id not in the catalog leaves the order as is;
/// an index past the end moves the column last.
pub fn move_column<R>(catalog: &ColumnCatalog<R>, order: &[String], id: &str, to_index: usize) -> Vec<String> {
    let mut ids: Vec<String> = ordered_columns(catalog, order)
        .into_iter()
        .map(|column| column.id.clone())
        .collect();

    if let Some(from) = ids.iter().position(|existing| existing == id) {
        let moved = ids.remove(from);
        ids.insert(to_index.min(ids.len()), moved);
    }
    ids
}
