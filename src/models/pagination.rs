//! Pagination metadata decoded from the backend's response headers.
//!
//! List endpoints return a JSON array body with the page geometry carried
//! out-of-band in `X-*` headers. Parsing is tolerant: a missing or malformed
//! count header degrades to "unknown total", it never fails the response.

use reqwest::header::HeaderMap;
use serde::Serialize;

/// Header carrying the zero-based index of the returned page.
pub const CURRENT_PAGE_HEADER: &str = "X-Current-Page";
/// Header carrying the requested page size.
pub const PAGE_SIZE_HEADER: &str = "X-Page-Size";
/// Header carrying the total result count across all pages, when known.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
/// Header carrying the total page count, when known.
pub const PAGE_COUNT_HEADER: &str = "X-Page-Count";
/// Header indicating whether a next page exists.
pub const HAS_NEXT_PAGE_HEADER: &str = "X-Has-Next-Page";

/// Immutable page geometry for one search response.
///
/// Rebuilt from scratch on every response and replaced wholesale; never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationData {
    /// Zero-based page index.
    pub page: u32,
    /// Items per page (always at least 1).
    pub page_size: u32,
    /// Number of items actually present on this page.
    pub current_page_items: u32,
    /// Total result count, when the backend computed one.
    pub total_count: Option<u64>,
    /// Total page count, when the backend computed one.
    pub page_count: Option<u32>,
    /// Whether a page after this one exists.
    pub has_next: bool,
}

impl PaginationData {
    /// Decode pagination headers for a response whose body held
    /// `current_page_items` items.
    ///
    /// Malformed or absent numeric headers never error: `total_count` and
    /// `page_count` degrade to `None`, `page` defaults to 0 and `page_size`
    /// to the body length. `has_next` is true only for the exact string
    /// `"true"`.
    pub fn from_headers(headers: &HeaderMap, current_page_items: usize) -> Self {
        let current_page_items = current_page_items as u32;
        Self {
            page: header_u64(headers, CURRENT_PAGE_HEADER).unwrap_or(0) as u32,
            page_size: header_u64(headers, PAGE_SIZE_HEADER)
                .map(|v| v as u32)
                .unwrap_or_else(|| current_page_items.max(1)),
            current_page_items,
            total_count: header_u64(headers, TOTAL_COUNT_HEADER),
            page_count: header_u64(headers, PAGE_COUNT_HEADER).map(|v| v as u32),
            has_next: headers
                .get(HAS_NEXT_PAGE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v == "true")
                .unwrap_or(false),
        }
    }

    /// Whether a total count is known. Callers must check this before
    /// displaying `total_count`.
    pub fn has_total_count(&self) -> bool {
        self.total_count.is_some()
    }

    /// One-based index of the first item on this page.
    pub fn first_item(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size) + 1
    }

    /// One-based index of the last item on this page. For an empty page this
    /// is `first_item() - 1`.
    pub fn last_item(&self) -> u64 {
        self.first_item() + u64::from(self.current_page_items) - 1
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
