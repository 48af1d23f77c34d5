//! Remote list collaborators.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::PageRequest;
use super::PageResult;
use crate::error::FetchError;

/// Source of paginated rows, usually a typed REST client.
///
/// Transport, retries and timeouts belong to the implementation. The
/// controller only awaits the result.
#[async_trait]
pub trait RemoteList<R>: Send + Sync {
    /// Fetch one page.
    async fn fetch(&self, request: PageRequest) -> Result<PageResult<R>, FetchError>;
}

/// Adapts an async closure into a [`RemoteList`].
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use tableview_lib::error::FetchError;
/// use tableview_lib::query::{FnRemote, PageRequest, PageResult};
///
/// let remote = FnRemote::new(|request: PageRequest| {
///     async move { Ok::<_, FetchError>(PageResult::new(vec![request.page], 1)) }.boxed()
/// });
/// ```
pub struct FnRemote<F> {
    f: F,
}

impl<F> FnRemote<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<R, F> RemoteList<R> for FnRemote<F>
where
    R: Send + 'static,
    F: Fn(PageRequest) -> BoxFuture<'static, Result<PageResult<R>, FetchError>> + Send + Sync,
{
    async fn fetch(&self, request: PageRequest) -> Result<PageResult<R>, FetchError> {
        (self.f)(request).await
    }
}

type Matcher<R> = Arc<dyn Fn(&R, &str) -> bool + Send + Sync>;

/// A [`RemoteList`] over rows held in memory.
///
/// Search text is matched with the given predicate; empty search matches
/// every row. Handy for demos and tests.
pub struct InMemoryList<R> {
    rows: Vec<R>,
    matcher: Matcher<R>,
    latency: Option<Duration>,
}

impl<R: Clone + Send + Sync + 'static> InMemoryList<R> {
    /// Creates a list whose rows match a search when `matcher` says so.
    pub fn new(rows: Vec<R>, matcher: impl Fn(&R, &str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            rows,
            matcher: Arc::new(matcher),
            latency: None,
        }
    }

    /// Delays every fetch, to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Runs a query synchronously.
    pub fn query(&self, request: &PageRequest) -> PageResult<R> {
        let matching: Vec<&R> = self
            .rows
            .iter()
            .filter(|row| request.search_text.is_empty() || (self.matcher)(*row, request.search_text.as_str()))
            .collect();

        let rows = matching
            .iter()
            .skip(request.offset())
            .take(request.size as usize)
            .map(|row| (*row).clone())
            .collect();

        PageResult::new(rows, matching.len() as u64)
    }
}

#[async_trait]
impl<R: Clone + Send + Sync + 'static> RemoteList<R> for InMemoryList<R> {
    async fn fetch(&self, request: PageRequest) -> Result<PageResult<R>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.query(&request))
    }
}

impl<R> fmt::Debug for InMemoryList<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryList")
            .field("rows", &self.rows.len())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}
