//! Pagination contract shared by every paged listing.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query parameters accepted by paged endpoints.
///
/// `page` is 1-based. Out-of-range values are clamped by [`normalized`]
/// rather than rejected; an over-long `search` string is rejected by the
/// service layer instead.
///
/// [`normalized`]: PaginationQuery::normalized
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// 1-based page index.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of entries per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Optional case-insensitive search filter.
    #[serde(default)]
    pub search: Option<String>,
}

const fn default_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl PaginationQuery {
    /// Maximum entries per page.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Maximum length of the search filter.
    pub const MAX_SEARCH_LENGTH: usize = 100;

    /// Clamp page and page size into their valid ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, Self::MAX_PAGE_SIZE);
        self
    }

    /// Row offset for the current page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Row limit for the current page.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// One page of results plus the total count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    /// 1-based page index this response covers.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of matching entries across all pages.
    pub total_count: i64,
    /// Entries on this page.
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    /// Assemble a page of results.
    #[must_use]
    pub const fn new(query: &PaginationQuery, total_count: i64, data: Vec<T>) -> Self {
        Self {
            page: query.page,
            page_size: query.page_size,
            total_count,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery {
            page: 0,
            page_size: 10_000,
            search: None,
        }
        .normalized();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, PaginationQuery::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_limit() {
        let q = PaginationQuery {
            page: 3,
            page_size: 25,
            search: None,
        };
        assert_eq!(q.offset(), 50);
        assert_eq!(q.limit(), 25);
    }

    #[test]
    fn test_defaults() {
        let q = PaginationQuery::default();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 20);
        assert!(q.search.is_none());
    }
}
