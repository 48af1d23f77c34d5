//! Query configuration

/// Paging defaults for a query controller.
///
/// # Example
///
/// ```
/// use tableview_lib::query::QueryConfig;
///
/// let config = QueryConfig::default().with_page_size(25);
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Initial page size.
    ///
    /// Default: 10
    pub page_size: u32,

    /// Sizes offered to the user. Other positive sizes are still accepted.
    ///
    /// Default: 5, 10, 25, 50, 100
    pub page_size_options: Vec<u32>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_size_options: vec![5, 10, 25, 50, 100],
        }
    }
}

impl QueryConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size. Zero is replaced by 1.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the offered page sizes.
    pub fn with_page_size_options(mut self, options: impl Into<Vec<u32>>) -> Self {
        self.page_size_options = options.into();
        self
    }
}
