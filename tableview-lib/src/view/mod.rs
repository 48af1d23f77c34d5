//! View controller.
//!
//! Composes the preference store, column materializer, query controller
//! and selection tracker for one table view, and exposes the callbacks a
//! renderer drives. All state is owned by the controller; the only async
//! boundary is the remote fetch, which runs as a tokio task and reports
//! back over a channel.

mod config;
mod snapshot;

pub use config::ViewConfig;
pub use snapshot::TableSnapshot;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::columns;
use crate::columns::ChooserEntry;
use crate::columns::RenderColumn;
use crate::error::FetchError;
use crate::error::PreferenceError;
use crate::model::ColumnCatalog;
use crate::model::Row;
use crate::prefs::PreferenceBackend;
use crate::prefs::PreferenceStore;
use crate::prefs::ViewPreferences;
use crate::query::FetchTicket;
use crate::query::PageResult;
use crate::query::QueryController;
use crate::query::RemoteList;
use crate::query::Resolution;
use crate::selection::HeaderState;
use crate::selection::SelectionTracker;

type ActivateHandler<R> = Box<dyn FnMut(&R) + Send>;

/// A finished fetch on its way back to the controller.
struct Completion<R> {
    ticket: FetchTicket,
    result: Result<PageResult<R>, FetchError>,
}

/// State and callbacks for one table view.
///
/// Methods that change query parameters spawn the fetch on the current
/// tokio runtime and must be called from within one. Results are applied
/// when the owner calls [`next_completion`](Self::next_completion),
/// [`settle`](Self::settle) or [`drain_completions`](Self::drain_completions).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tableview_lib::model::{CellValue, ColumnCatalog, ColumnDescriptor, ColumnType, Row};
/// use tableview_lib::prefs::MemoryBackend;
/// use tableview_lib::query::InMemoryList;
/// use tableview_lib::view::{ViewConfig, ViewController};
///
/// #[derive(Clone)]
/// struct Dataset { id: String, name: String }
///
/// impl Row for Dataset {
///     fn id(&self) -> String { self.id.clone() }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let catalog = ColumnCatalog::new(vec![
///     ColumnDescriptor::new("name", "Name", ColumnType::String)
///         .with_accessor(|d: &Dataset| CellValue::from(d.name.as_str())),
/// ])
/// .unwrap();
/// let rows = vec![Dataset { id: "d1".into(), name: "golden".into() }];
/// let remote = InMemoryList::new(rows, |d: &Dataset, q| d.name.contains(q));
///
/// let mut view = ViewController::with_backend(
///     catalog,
///     Arc::new(MemoryBackend::new()),
///     Arc::new(remote),
///     ViewConfig::new("datasets").with_default_selected(["name"]),
/// );
/// view.refresh();
/// view.settle().await;
///
/// let snapshot = view.snapshot();
/// assert_eq!(snapshot.rows.len(), 1);
/// assert_eq!(snapshot.columns.len(), 2);
/// # }
/// ```
pub struct ViewController<R: Row> {
    catalog: ColumnCatalog<R>,
    config: ViewConfig,
    store: PreferenceStore,
    /// Loaded on first use.
    prefs: Option<ViewPreferences>,
    /// Memoized materializer output, dropped on any preference change.
    columns: Option<Vec<RenderColumn>>,
    query: QueryController<R>,
    selection: SelectionTracker,
    remote: Arc<dyn RemoteList<R>>,
    completions_tx: mpsc::UnboundedSender<Completion<R>>,
    completions_rx: mpsc::UnboundedReceiver<Completion<R>>,
    in_flight: usize,
    on_activate: Option<ActivateHandler<R>>,
}

impl<R: Row> ViewController<R> {
    /// Creates a view over an explicit preference store.
    pub fn new(
        catalog: ColumnCatalog<R>,
        store: PreferenceStore,
        remote: Arc<dyn RemoteList<R>>,
        config: ViewConfig,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            query: QueryController::new(config.query.clone()),
            catalog,
            config,
            store,
            prefs: None,
            columns: None,
            selection: SelectionTracker::new(),
            remote,
            completions_tx,
            completions_rx,
            in_flight: 0,
            on_activate: None,
        }
    }

    /// Creates a view whose store is built from `config` over `backend`.
    pub fn with_backend(
        catalog: ColumnCatalog<R>,
        backend: Arc<dyn PreferenceBackend>,
        remote: Arc<dyn RemoteList<R>>,
        config: ViewConfig,
    ) -> Self {
        let store = config.preference_store(backend);
        Self::new(catalog, store, remote, config)
    }

    pub fn catalog(&self) -> &ColumnCatalog<R> {
        &self.catalog
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn query(&self) -> &QueryController<R> {
        &self.query
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    // -------------------------------------------------------------------------
    // Columns and preferences
    // -------------------------------------------------------------------------

    /// The current preferences, read from the store on first use.
    pub fn preferences(&mut self) -> &ViewPreferences {
        Self::load_prefs(&self.store, &mut self.prefs)
    }

    /// The columns to render, recomputed only after preferences change.
    pub fn columns(&mut self) -> &[RenderColumn] {
        if self.columns.is_none() {
            let prefs = Self::load_prefs(&self.store, &mut self.prefs);
            let materialized = columns::materialize(&self.catalog, prefs, &self.config.leading, &self.config.trailing);
            self.columns = Some(materialized);
        }
        self.columns.as_deref().unwrap_or_default()
    }

    /// Every selectable column with its visibility, for a column picker.
    pub fn chooser(&mut self) -> Vec<ChooserEntry> {
        let prefs = Self::load_prefs(&self.store, &mut self.prefs);
        columns::chooser_entries(&self.catalog, prefs)
    }

    /// Replace the visible column set.
    pub fn on_column_visibility_change<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefs = self.prefs_mut();
        prefs.selected_column_ids = ids.into_iter().map(Into::into).collect();
        let selected = prefs.selected_column_ids.clone();
        self.columns = None;
        self.persist("selected columns", |store| store.write_selected(selected));
    }

    /// Replace the column order.
    pub fn on_column_reorder(&mut self, order: Vec<String>) {
        let prefs = self.prefs_mut();
        prefs.column_order = order;
        let order = prefs.column_order.clone();
        self.columns = None;
        self.persist("column order", |store| store.write_order(&order));
    }

    /// Record a column's new width.
    ///
    /// Synthetic and unknown columns are ignored.
    pub fn on_column_resize(&mut self, id: &str, width: u32) {
        if self.config.is_synthetic(id) || self.catalog.get(id).is_none() {
            log::debug!("Ignoring resize of non-data column {}", id);
            return;
        }
        self.prefs_mut().column_widths.insert(id.to_string(), width);
        self.columns = None;
        self.persist("column width", |store| store.write_width(id, width));
    }

    /// Record several widths at once, e.g. after a drag that reflowed
    /// neighbours. Entries for synthetic or unknown columns are dropped.
    pub fn on_columns_resize(&mut self, widths: BTreeMap<String, u32>) {
        for (id, width) in widths {
            self.on_column_resize(&id, width);
        }
    }

    /// Show a hidden column or hide a shown one.
    pub fn toggle_column(&mut self, id: &str) {
        let next = columns::toggle_column(&self.preferences().selected_column_ids, id);
        self.on_column_visibility_change(next);
    }

    /// Move a column to a position in the full display order.
    pub fn move_column(&mut self, id: &str, to_index: usize) {
        let order = self.preferences().column_order.clone();
        let next = columns::move_column(&self.catalog, &order, id, to_index);
        self.on_column_reorder(next);
    }

    /// Drop cached preferences so the next read goes to the store, picking
    /// up writes made by other views sharing this backend instance. Writes
    /// from another process are not seen through a cached backend such as
    /// [`SqliteBackend`](crate::prefs::SqliteBackend).
    pub fn reload_preferences(&mut self) {
        self.prefs = None;
        self.columns = None;
    }

    /// Forget every stored preference for this view.
    pub fn reset_preferences(&mut self) -> Result<(), PreferenceError> {
        self.store.reset()?;
        self.reload_preferences();
        Ok(())
    }

    fn load_prefs<'a>(store: &PreferenceStore, prefs: &'a mut Option<ViewPreferences>) -> &'a mut ViewPreferences {
        prefs.get_or_insert_with(|| store.read())
    }

    fn prefs_mut(&mut self) -> &mut ViewPreferences {
        Self::load_prefs(&self.store, &mut self.prefs)
    }

    fn persist(&self, what: &str, write: impl FnOnce(&PreferenceStore) -> Result<(), PreferenceError>) {
        if let Err(e) = write(&self.store) {
            log::warn!("Failed to persist {} for {}: {}", what, self.store.namespace(), e);
        }
    }

    // -------------------------------------------------------------------------
    // Query
    // -------------------------------------------------------------------------

    /// Fetch the current page again. Call once after construction to load
    /// the first page.
    pub fn refresh(&mut self) {
        let ticket = self.query.refresh();
        self.dispatch(ticket);
    }

    /// New search text; jumps back to page 1.
    pub fn on_search_change(&mut self, text: impl Into<String>) {
        if let Some(ticket) = self.query.set_search(text) {
            self.dispatch(ticket);
        }
    }

    pub fn on_page_change(&mut self, page: u32) {
        if let Some(ticket) = self.query.set_page(page) {
            self.dispatch(ticket);
        }
    }

    pub fn on_size_change(&mut self, size: u32) {
        if let Some(ticket) = self.query.set_size(size) {
            self.dispatch(ticket);
        }
    }

    pub fn next_page(&mut self) {
        if let Some(ticket) = self.query.next_page() {
            self.dispatch(ticket);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(ticket) = self.query.previous_page() {
            self.dispatch(ticket);
        }
    }

    /// Number of fetches issued but not yet handed back.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Resolution> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Wait until every issued fetch has finished.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Apply whatever has already finished without waiting. Returns how
    /// many results were applied (discarded ones are not counted).
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) == Resolution::Applied {
                applied += 1;
            }
        }
        applied
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        let remote = Arc::clone(&self.remote);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let request = ticket.request().clone();
            let fetch = tokio::spawn(async move { remote.fetch(request).await });
            // A panicking fetch still has to report back.
            let result = fetch.await.unwrap_or(Err(FetchError::Cancelled));
            let _ = tx.send(Completion { ticket, result });
        });
    }

    fn apply(&mut self, completion: Completion<R>) -> Resolution {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.query.resolve(&completion.ticket, completion.result)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Flip one row. Returns the new state.
    pub fn on_selection_toggle(&mut self, row_id: &str) -> bool {
        self.selection.toggle(row_id)
    }

    /// Select or deselect all of `visible`.
    pub fn on_select_all_visible<I, S>(&mut self, visible: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.toggle_all(visible);
    }

    /// Select or deselect every row currently displayed.
    pub fn toggle_all_rows(&mut self) {
        let ids: Vec<String> = self.query.rows().iter().map(Row::id).collect();
        self.selection.toggle_all(ids);
    }

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selection.is_selected(row_id)
    }

    /// Selected rows among those displayed, in display order.
    pub fn selected_rows(&self) -> Vec<&R> {
        self.selection.selected_rows_of(self.query.rows())
    }

    /// Header checkbox state for the displayed rows.
    pub fn header_state(&self) -> HeaderState {
        self.selection.header_state(self.query.rows().iter().map(Row::id))
    }

    /// Forget specific rows, e.g. after deleting them.
    pub fn deselect<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.deselect(ids);
    }

    /// Clear every selection. Selection is never cleared implicitly.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Register what happens when a row is activated (clicked/entered).
    pub fn set_row_activate_handler(&mut self, handler: impl FnMut(&R) + Send + 'static) {
        self.on_activate = Some(Box::new(handler));
    }

    /// Activate a row. Returns `false` if no handler is registered.
    pub fn on_row_activate(&mut self, row: &R) -> bool {
        match self.on_activate.as_mut() {
            Some(handler) => {
                handler(row);
                true
            }
            None => false,
        }
    }

    /// Message for an empty settled result, if the result is empty.
    pub fn empty_message(&self) -> Option<&str> {
        if !self.query.status().is_settled() || !self.query.rows().is_empty() {
            return None;
        }
        if self.query.search_text().is_empty() {
            Some(self.config.no_data_message.as_str())
        } else {
            Some(self.config.no_results_message.as_str())
        }
    }

    /// Everything needed to draw the table.
    pub fn snapshot(&mut self) -> TableSnapshot<R> {
        let columns = self.columns().to_vec();
        let rows = self.query.rows().to_vec();
        let selected = rows
            .iter()
            .map(Row::id)
            .filter(|id| self.selection.is_selected(id))
            .collect();

        TableSnapshot {
            columns,
            rows,
            total: self.query.total(),
            total_pages: self.query.total_pages(),
            request: self.query.request().clone(),
            status: self.query.status(),
            stale: self.query.is_stale(),
            error: self.query.error().cloned(),
            empty_message: self.empty_message().map(str::to_string),
            header: self.header_state(),
            selected,
            selected_count: self.selection.selected_count(),
        }
    }
}
