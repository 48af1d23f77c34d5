//! Row selection tracking.
//!
//! Selection is keyed by row id and lives outside pagination, so rows
//! picked on one page stay picked while the user looks at another. Nothing
//! here clears selection implicitly; callers clear it after destructive
//! actions or when leaving the view.

use std::collections::HashMap;

use crate::model::Row;

/// State of a "select all visible" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderState {
    /// No visible row is selected.
    #[default]
    None,
    /// Some, but not all, visible rows are selected.
    Partial,
    /// Every visible row is selected.
    All,
}

/// Tracks selected rows by id. An absent id counts as unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    state: HashMap<String, bool>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row. Returns the new state.
    pub fn toggle(&mut self, row_id: &str) -> bool {
        let entry = self.state.entry(row_id.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Set one row explicitly.
    pub fn set(&mut self, row_id: &str, selected: bool) {
        self.state.insert(row_id.to_string(), selected);
    }

    /// Select every visible row unless all are already selected, in which
    /// case deselect them all. Rows outside `visible` are untouched.
    ///
    /// With an empty `visible` this does nothing. Two calls restore a
    /// uniform starting state; a partial one ends fully deselected.
    pub fn toggle_all<I, S>(&mut self, visible: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let visible: Vec<S> = visible.into_iter().collect();
        let all_selected = visible.iter().all(|id| self.is_selected(id.as_ref()));
        for id in &visible {
            self.state.insert(id.as_ref().to_string(), !all_selected);
        }
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, row_id: &str) -> bool {
        self.state.get(row_id).copied().unwrap_or(false)
    }

    /// The selected rows among `rows`, in `rows` order.
    pub fn selected_rows_of<'a, R: Row>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter().filter(|row| self.is_selected(&row.id())).collect()
    }

    /// Header checkbox state for the visible rows.
    pub fn header_state<I, S>(&self, visible: I) -> HeaderState
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (mut total, mut selected) = (0usize, 0usize);
        for id in visible {
            total += 1;
            if self.is_selected(id.as_ref()) {
                selected += 1;
            }
        }
        match selected {
            0 => HeaderState::None,
            n if n == total => HeaderState::All,
            _ => HeaderState::Partial,
        }
    }

    /// Every selected id, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of selected rows across all pages.
    pub fn selected_count(&self) -> usize {
        self.state.values().filter(|selected| **selected).count()
    }

    /// Forget the given rows (e.g. after deleting them).
    pub fn deselect<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.state.remove(id.as_ref());
        }
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(&'static str);

    impl Row for Item {
        fn id(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionTracker::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(!selection.is_selected("a"));
        assert!(!selection.is_selected("never"));
    }

    #[test]
    fn test_toggle_all_selects_when_partial() {
        let mut selection = SelectionTracker::new();
        selection.toggle("a");
        selection.toggle_all(["a", "b", "c"]);
        assert_eq!(selection.selected_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_all_deselects_when_full() {
        let mut selection = SelectionTracker::new();
        selection.toggle_all(["a", "b"]);
        selection.toggle_all(["a", "b"]);
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn test_toggle_all_twice_restores_uniform_state() {
        for initial in [vec![], vec!["a", "b"], vec!["z"], vec!["a", "b", "z"]] {
            let mut selection = SelectionTracker::new();
            for id in &initial {
                selection.toggle(id);
            }
            let before = selection.selected_ids();
            selection.toggle_all(["a", "b"]);
            selection.toggle_all(["a", "b"]);
            assert_eq!(selection.selected_ids(), before, "initial {:?}", initial);
        }
    }

    #[test]
    fn test_toggle_all_partial_goes_all_then_none() {
        let mut selection = SelectionTracker::new();
        selection.toggle("a");
        selection.toggle_all(["a", "b"]);
        assert_eq!(selection.header_state(["a", "b"]), HeaderState::All);
        selection.toggle_all(["a", "b"]);
        assert_eq!(selection.header_state(["a", "b"]), HeaderState::None);
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn test_toggle_all_leaves_other_rows() {
        let mut selection = SelectionTracker::new();
        selection.toggle("page1-row");
        selection.toggle_all(["page2-a", "page2-b"]);
        selection.toggle_all(["page2-a", "page2-b"]);
        assert!(selection.is_selected("page1-row"));
    }

    #[test]
    fn test_header_state() {
        let mut selection = SelectionTracker::new();
        assert_eq!(selection.header_state(["a", "b"]), HeaderState::None);
        selection.toggle("a");
        assert_eq!(selection.header_state(["a", "b"]), HeaderState::Partial);
        selection.toggle("b");
        assert_eq!(selection.header_state(["a", "b"]), HeaderState::All);
    }

    #[test]
    fn test_selected_rows_of_keeps_row_order() {
        let rows = vec![Item("c"), Item("a"), Item("b")];
        let mut selection = SelectionTracker::new();
        selection.toggle("b");
        selection.toggle("c");
        assert_eq!(selection.selected_rows_of(&rows), vec![&Item("c"), &Item("b")]);
    }

    #[test]
    fn test_deselect_and_clear() {
        let mut selection = SelectionTracker::new();
        selection.toggle_all(["a", "b", "c"]);
        selection.deselect(["b"]);
        assert_eq!(selection.selected_ids(), vec!["a", "c"]);
        selection.clear();
        assert_eq!(selection.selected_count(), 0);
    }
}
