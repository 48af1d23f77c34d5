//! Page request and result types.

use serde::Deserialize;
use serde::Serialize;

/// Parameters of one page fetch.
///
/// `page` is 1-based and `size` is always positive; the controller
/// enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(rename = "search")]
    pub search_text: String,
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// First page of an unfiltered listing.
    pub fn first(size: u32) -> Self {
        Self {
            search_text: String::new(),
            page: 1,
            size: size.max(1),
        }
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.size as usize)
    }
}

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<R> {
    #[serde(rename = "content")]
    pub rows: Vec<R>,
    pub total: u64,
}

impl<R> PageResult<R> {
    pub fn new(rows: Vec<R>, total: u64) -> Self {
        Self { rows, total }
    }

    /// An empty result.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }

    /// Number of pages at the given size. Never less than 1.
    pub fn total_pages(&self, size: u32) -> u32 {
        let size = u64::from(size.max(1));
        self.total.div_ceil(size).max(1).min(u64::from(u32::MAX)) as u32
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let request = PageRequest {
            search_text: String::new(),
            page: 3,
            size: 25,
        };
        assert_eq!(request.offset(), 50);
        assert_eq!(PageRequest::first(10).offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PageResult::<()>::new(vec![], 0).total_pages(10), 1);
        assert_eq!(PageResult::<()>::new(vec![], 10).total_pages(10), 1);
        assert_eq!(PageResult::<()>::new(vec![], 11).total_pages(10), 2);
        assert_eq!(PageResult::<()>::new(vec![], 11).total_pages(0), 11);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(PageRequest::first(10)).unwrap();
        assert_eq!(json, serde_json::json!({"search": "", "page": 1, "size": 10}));

        let result: PageResult<String> = serde_json::from_str(r#"{"content":["a","b"],"total":7}"#).unwrap();
        assert_eq!(result.rows, vec!["a", "b"]);
        assert_eq!(result.total, 7);
    }
}
