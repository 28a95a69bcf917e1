use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 6, max: 24)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 24)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Clamped page number, pulled back to the last page when it overshoots
    /// the collection so a data change never leaves a dangling empty page.
    pub fn page_for_total(&self, total: i64) -> i64 {
        self.page.max(1).min(total_pages(total, self.limit()))
    }

    /// SQL OFFSET for the given collection size
    pub fn offset_for_total(&self, total: i64) -> i64 {
        (self.page_for_total(total) - 1) * self.limit()
    }
}

/// Number of pages a collection of `total` items spans, never less than 1.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    ((total + page_size - 1) / page_size).max(1)
}

/// Paginated listing envelope matching the observed wire shape of the
/// project listing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 6), 1);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(24, 24), 1);
    }

    #[test]
    fn page_size_is_clamped_to_bounds() {
        let q = PaginationQuery {
            page: 1,
            page_size: 0,
        };
        assert_eq!(q.limit(), 1);

        let q = PaginationQuery {
            page: 1,
            page_size: 500,
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn page_is_pulled_back_when_past_the_end() {
        let q = PaginationQuery {
            page: 9,
            page_size: 6,
        };
        // 13 items over 6 per page is 3 pages
        assert_eq!(q.page_for_total(13), 3);
        assert_eq!(q.offset_for_total(13), 12);
    }

    #[test]
    fn page_is_clamped_to_at_least_one() {
        let q = PaginationQuery {
            page: 0,
            page_size: 6,
        };
        assert_eq!(q.page_for_total(0), 1);
        assert_eq!(q.offset_for_total(0), 0);
    }

    #[test]
    fn offset_never_exceeds_total() {
        for total in 0..50 {
            for page in 1..12 {
                let q = PaginationQuery { page, page_size: 6 };
                assert!(q.offset_for_total(total) <= total.max(0));
            }
        }
    }
}
