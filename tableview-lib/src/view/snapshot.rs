//! Render snapshot

use crate::columns::RenderColumn;
use crate::error::FetchError;
use crate::query::PageRequest;
use crate::query::QueryStatus;
use crate::selection::HeaderState;

/// Everything a renderer needs to draw the table once.
#[derive(Debug, Clone)]
pub struct TableSnapshot<R> {
    pub columns: Vec<RenderColumn>,
    /// Rows of the last good page. May be stale while loading.
    pub rows: Vec<R>,
    pub total: u64,
    pub total_pages: u32,
    pub request: PageRequest,
    pub status: QueryStatus,
    /// `true` if `rows` belong to an older request.
    pub stale: bool,
    pub error: Option<FetchError>,
    /// Set when a settled query returned no rows.
    pub empty_message: Option<String>,
    pub header: HeaderState,
    /// Ids of `rows` that are selected, in row order.
    pub selected: Vec<String>,
    /// Selected rows across every page.
    pub selected_count: usize,
}
