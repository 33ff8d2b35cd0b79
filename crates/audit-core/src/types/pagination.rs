//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 1000;
/// Deepest reachable record (`offset + size`), matching Elasticsearch's
/// default `index.max_result_window`.
pub const MAX_RESULT_WINDOW: u64 = 10_000;

/// Request parameters for paginated queries.
///
/// Pages are zero-based: page `0` is the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index (0-based).
    #[serde(default)]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the size into `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Maximum number of items on this page.
    pub fn limit(&self) -> u64 {
        self.size
    }

    /// Returns `true` when the page ends within [`MAX_RESULT_WINDOW`].
    pub fn within_result_window(&self) -> bool {
        self.offset().saturating_add(self.size) <= MAX_RESULT_WINDOW
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
