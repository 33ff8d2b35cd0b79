//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use audit_core::error::AppError;
use audit_core::types::PageRequest;
use audit_core::types::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_RESULT_WINDOW};

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (0-based, default: 0).
    #[serde(default)]
    pub page: u64,
    /// Items per page (default: 10, max: 1000).
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Converts to a `PageRequest`, rejecting sizes outside `1..=1000` and
    /// pages that end past the result window.
    pub fn into_page_request(self) -> Result<PageRequest, AppError> {
        if self.size == 0 || self.size > MAX_PAGE_SIZE {
            return Err(AppError::validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let page = PageRequest::new(self.page, self.size);
        if !page.within_result_window() {
            return Err(AppError::validation(format!(
                "page * size + size must not exceed {MAX_RESULT_WINDOW}"
            )));
        }
        Ok(page)
    }
}
