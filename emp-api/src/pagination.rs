//! Page-number pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A 1-based page number and a page size clamped to [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Missing or non-positive sizes fall back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page_size = match page_size {
            Some(size) if size > 0 => size.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self {
            page: page.unwrap_or(1),
            page_size,
        }
    }

    /// Rows to skip. Saturates for page numbers no table could reach.
    pub fn offset(&self) -> i64 {
        self.checked_offset().unwrap_or(i64::MAX)
    }

    fn checked_offset(&self) -> Option<i64> {
        self.page.checked_sub(1)?.checked_mul(self.page_size)
    }

    /// The first page always exists, even for an empty collection.
    pub fn is_valid_for(&self, total: i64) -> bool {
        self.page == 1
            || (self.page > 1 && self.checked_offset().is_some_and(|offset| offset < total))
    }

    fn has_next(&self, total: i64) -> bool {
        self.page
            .checked_mul(self.page_size)
            .is_some_and(|end| end < total)
    }
}

/// Pagination envelope returned by list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `link_base` is the list URL without a query string, e.g.
    /// `http://host/employee/`.
    pub fn new(results: Vec<T>, count: i64, request: PageRequest, link_base: &str) -> Self {
        let link = |page: i64| format!("{}?page={}&page_size={}", link_base, page, request.page_size);
        Self {
            count,
            next: request.has_next(count).then(|| link(request.page + 1)),
            previous: (request.page > 1).then(|| link(request.page - 1)),
            results,
        }
    }
}
