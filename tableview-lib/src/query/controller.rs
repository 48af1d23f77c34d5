//! Paginated query state machine.

use crate::error::FetchError;

use super::PageRequest;
use super::PageResult;
use super::QueryConfig;

/// Where the controller is in its fetch cycle.
///
/// ```text
/// Idle -> Loading -> Settled
///            ^  \-> Error
///            '--- any parameter change
/// ```
///
/// The last good page survives `Loading` and `Error`, so the renderer can
/// keep showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Nothing issued yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The latest fetch succeeded.
    Settled,
    /// The latest fetch failed.
    Error,
}

impl QueryStatus {
    /// Check if nothing has been issued yet
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a fetch is outstanding
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the latest fetch succeeded
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }

    /// Check if the latest fetch failed
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Handle for one issued fetch.
///
/// Carries the request snapshot to send and the sequence number used to
/// decide, on completion, whether the result may still be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    request: PageRequest,
}

impl FetchTicket {
    /// Issue order; later tickets have larger numbers.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The request to send.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }
}

/// Outcome of handing a completed fetch back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The result became the displayed state.
    Applied,
    /// A newer fetch had been issued; the result was dropped.
    Discarded,
}

/// Owns the current search/page/size and the last fetched page.
///
/// Every parameter change issues a [`FetchTicket`] for the caller to run.
/// Completed fetches come back through [`resolve`](Self::resolve), which
/// only accepts the most recently issued ticket. An earlier fetch that
/// finishes late is dropped, so stale results never overwrite fresh ones.
///
/// # Example
///
/// ```
/// use tableview_lib::query::{PageResult, QueryConfig, QueryController, Resolution};
///
/// let mut query = QueryController::<&str>::new(QueryConfig::default());
/// let first = query.refresh();
/// let second = query.set_page(2).unwrap();
///
/// assert_eq!(query.resolve(&second, Ok(PageResult::new(vec!["b"], 20))), Resolution::Applied);
/// assert_eq!(query.resolve(&first, Ok(PageResult::new(vec!["a"], 20))), Resolution::Discarded);
/// assert_eq!(query.rows(), ["b"]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryController<R> {
    config: QueryConfig,
    request: PageRequest,
    status: QueryStatus,
    /// Sequence number of the most recently issued ticket.
    latest: u64,
    data: Option<PageResult<R>>,
    error: Option<FetchError>,
}

impl<R> QueryController<R> {
    /// Creates an idle controller on page 1 with an empty search.
    pub fn new(config: QueryConfig) -> Self {
        Self {
            request: PageRequest::first(config.page_size),
            config,
            status: QueryStatus::Idle,
            latest: 0,
            data: None,
            error: None,
        }
    }

    // -------------------------------------------------------------------------
    // Parameters
    // -------------------------------------------------------------------------

    /// The current request parameters.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn search_text(&self) -> &str {
        &self.request.search_text
    }

    pub fn page(&self) -> u32 {
        self.request.page
    }

    pub fn size(&self) -> u32 {
        self.request.size
    }

    /// Page sizes to offer the user.
    pub fn size_options(&self) -> &[u32] {
        &self.config.page_size_options
    }

    /// Change the search text and jump back to page 1.
    ///
    /// Returns `None` if the text is unchanged.
    pub fn set_search(&mut self, text: impl Into<String>) -> Option<FetchTicket> {
        let text = text.into();
        if text == self.request.search_text {
            return None;
        }
        self.request.search_text = text;
        self.request.page = 1;
        Some(self.issue())
    }

    /// Change the page. Zero is treated as 1.
    ///
    /// Returns `None` if the page is unchanged.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        let page = page.max(1);
        if page == self.request.page {
            return None;
        }
        self.request.page = page;
        Some(self.issue())
    }

    /// Change the page size, keeping search and page.
    ///
    /// Returns `None` if the size is zero or unchanged.
    pub fn set_size(&mut self, size: u32) -> Option<FetchTicket> {
        if size == 0 {
            log::warn!("Ignoring page size of 0");
            return None;
        }
        if size == self.request.size {
            return None;
        }
        self.request.size = size;
        Some(self.issue())
    }

    /// Go forward one page.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.request.page.saturating_add(1))
    }

    /// Go back one page. `None` on page 1.
    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.request.page.saturating_sub(1))
    }

    /// Re-issue the current request, e.g. on a refresh timer.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        self.status = QueryStatus::Loading;
        self.error = None;
        log::debug!("Issuing fetch #{} for {:?}", self.latest, self.request);
        FetchTicket {
            seq: self.latest,
            request: self.request.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Completion
    // -------------------------------------------------------------------------

    /// Hand back the result of a fetch.
    ///
    /// Applied only if `ticket` is the most recently issued one; anything
    /// older is discarded without touching state. A failure keeps the last
    /// good page.
    pub fn resolve(&mut self, ticket: &FetchTicket, result: Result<PageResult<R>, FetchError>) -> Resolution {
        if ticket.seq != self.latest {
            log::debug!(
                "Discarding fetch #{} for {:?}, superseded by #{}",
                ticket.seq,
                ticket.request,
                self.latest
            );
            return Resolution::Discarded;
        }

        match result {
            Ok(page) => {
                log::debug!("Fetch #{} settled with {} of {} rows", ticket.seq, page.len(), page.total);
                self.data = Some(page);
                self.error = None;
                self.status = QueryStatus::Settled;
            }
            Err(e) => {
                log::warn!("Fetch #{} failed: {}", ticket.seq, e);
                self.error = Some(e);
                self.status = QueryStatus::Error;
            }
        }
        Resolution::Applied
    }

    // -------------------------------------------------------------------------
    // Display state
    // -------------------------------------------------------------------------

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// The last successfully fetched page, which may be stale.
    pub fn data(&self) -> Option<&PageResult<R>> {
        self.data.as_ref()
    }

    /// Rows of the last good page, or nothing.
    pub fn rows(&self) -> &[R] {
        self.data.as_ref().map(|page| page.rows.as_slice()).unwrap_or_default()
    }

    /// Total of the last good page, or 0.
    pub fn total(&self) -> u64 {
        self.data.as_ref().map(|page| page.total).unwrap_or(0)
    }

    /// The failure of the latest fetch, while in [`QueryStatus::Error`].
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// `true` while loading with an older page still on display.
    pub fn is_stale(&self) -> bool {
        self.status.is_loading() && self.data.is_some()
    }

    /// Number of pages at the current size, from the last known total.
    pub fn total_pages(&self) -> u32 {
        self.data
            .as_ref()
            .map(|page| page.total_pages(self.request.size))
            .unwrap_or(1)
    }

    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.request.page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> QueryController<u32> {
        QueryController::new(QueryConfig::default())
    }

    fn page_of(request: &PageRequest, total: u64) -> PageResult<u32> {
        PageResult::new(vec![request.page], total)
    }

    #[test]
    fn test_starts_idle_on_first_page() {
        let query = controller();
        assert!(query.status().is_idle());
        assert_eq!(query.request(), &PageRequest::first(10));
        assert!(query.rows().is_empty());
        assert_eq!(query.total_pages(), 1);
    }

    #[test]
    fn test_search_resets_page() {
        let mut query = controller();
        let ticket = query.set_page(5).unwrap();
        query.resolve(&ticket, Ok(page_of(ticket.request(), 100)));

        let ticket = query.set_search("gpt").unwrap();
        assert_eq!(ticket.request().page, 1);
        assert_eq!(ticket.request().search_text, "gpt");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_page_and_size_keep_search() {
        let mut query = controller();
        query.set_search("eval");
        let ticket = query.set_page(3).unwrap();
        assert_eq!(ticket.request().search_text, "eval");
        let ticket = query.set_size(25).unwrap();
        assert_eq!(ticket.request().search_text, "eval");
        assert_eq!(ticket.request().page, 3);
        assert_eq!(ticket.request().size, 25);
    }

    #[test]
    fn test_unchanged_parameters_issue_nothing() {
        let mut query = controller();
        assert!(query.set_page(1).is_none());
        assert!(query.set_size(10).is_none());
        assert!(query.set_search("").is_none());
        assert!(query.set_size(0).is_none());
        assert!(query.previous_page().is_none());
        assert!(query.status().is_idle());
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        let mut query = controller();
        query.set_page(4);
        let ticket = query.set_page(0).unwrap();
        assert_eq!(ticket.request().page, 1);
    }

    #[test]
    fn test_late_earlier_fetch_is_discarded() {
        let mut query = controller();
        let r1 = query.refresh();
        let r2 = query.set_page(2).unwrap();

        assert_eq!(query.resolve(&r2, Ok(page_of(r2.request(), 30))), Resolution::Applied);
        assert_eq!(query.resolve(&r1, Ok(page_of(r1.request(), 30))), Resolution::Discarded);
        assert_eq!(query.rows(), [2]);
        assert!(query.status().is_settled());
    }

    #[test]
    fn test_early_earlier_fetch_is_discarded() {
        let mut query = controller();
        let r1 = query.refresh();
        let r2 = query.set_page(2).unwrap();

        assert_eq!(query.resolve(&r1, Ok(page_of(r1.request(), 30))), Resolution::Discarded);
        assert!(query.status().is_loading());
        assert!(query.rows().is_empty());
        assert_eq!(query.resolve(&r2, Ok(page_of(r2.request(), 30))), Resolution::Applied);
        assert_eq!(query.rows(), [2]);
    }

    #[test]
    fn test_superseded_failure_is_not_surfaced() {
        let mut query = controller();
        let r1 = query.refresh();
        let r2 = query.next_page().unwrap();
        query.resolve(&r2, Ok(page_of(r2.request(), 30)));
        query.resolve(&r1, Err(FetchError::Network("reset".into())));
        assert!(query.error().is_none());
        assert!(query.status().is_settled());
    }

    #[test]
    fn test_stale_data_kept_while_loading() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Ok(page_of(r1.request(), 30)));
        query.next_page();
        assert!(query.is_stale());
        assert_eq!(query.rows(), [1]);
    }

    #[test]
    fn test_failure_keeps_last_good_page() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Ok(page_of(r1.request(), 30)));
        let r2 = query.next_page().unwrap();
        query.resolve(&r2, Err(FetchError::http(500, "boom")));

        assert!(query.status().is_error());
        assert_eq!(query.error(), Some(&FetchError::http(500, "boom")));
        assert_eq!(query.rows(), [1]);
        assert_eq!(query.page(), 2);
    }

    #[test]
    fn test_failure_without_data() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Err(FetchError::Cancelled));
        assert!(query.status().is_error());
        assert!(query.data().is_none());
        assert_eq!(query.total(), 0);
    }

    #[test]
    fn test_new_request_clears_error_while_loading() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Err(FetchError::Cancelled));
        assert!(query.status().is_error());

        query.next_page();
        assert!(query.status().is_loading());
        assert!(query.error().is_none());
    }

    #[test]
    fn test_recovery_clears_error() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Err(FetchError::Cancelled));
        let r2 = query.refresh();
        query.resolve(&r2, Ok(page_of(r2.request(), 3)));
        assert!(query.error().is_none());
        assert!(query.status().is_settled());
    }

    #[test]
    fn test_paging_bounds() {
        let mut query = controller();
        let r1 = query.refresh();
        query.resolve(&r1, Ok(page_of(r1.request(), 25)));
        assert_eq!(query.total_pages(), 3);
        assert!(!query.has_previous());
        assert!(query.has_next());

        let r3 = query.set_page(3).unwrap();
        query.resolve(&r3, Ok(page_of(r3.request(), 25)));
        assert!(query.has_previous());
        assert!(!query.has_next());
    }
}
