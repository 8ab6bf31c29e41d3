//! Pagination metadata and the paginated result envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rows per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Pagination metadata. Serialises with camelCase keys
/// (`total` / `perPage` / `pageCount` / `currentPage`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub per_page: u64,
    pub page_count: u64,
    pub current_page: u64,
}

impl Pagination {
    /// Builds the metadata for `total` matching rows. `per_page` and
    /// `current_page` are clamped to at least 1, and
    /// `page_count = total.div_ceil(per_page)`.
    #[must_use]
    pub fn new(total: u64, per_page: u64, current_page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            total,
            per_page,
            page_count: total.div_ceil(per_page),
            current_page: current_page.max(1),
        }
    }

    /// Number of rows skipped before the current page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.current_page - 1) * self.per_page
    }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatorResult<T> {
    pub pagination: Pagination,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(Pagination::new(25, 10, 1).page_count, 3);
        assert_eq!(Pagination::new(30, 10, 1).page_count, 3);
        assert_eq!(Pagination::new(0, 10, 1).page_count, 0);
    }

    #[test]
    fn test_clamps_degenerate_input() {
        let pagination = Pagination::new(5, 0, 0);
        assert_eq!(pagination.per_page, 1, "zero per_page is clamped");
        assert_eq!(pagination.current_page, 1, "zero page is clamped");
        assert_eq!(pagination.page_count, 5);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(100, 10, 3).offset(), 20);
        assert_eq!(Pagination::new(100, 10, 1).offset(), 0);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let result = PaginatorResult {
            pagination: Pagination::new(25, 10, 2),
            data: vec!["a", "b"],
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "pagination": {
                    "total": 25,
                    "perPage": 10,
                    "pageCount": 3,
                    "currentPage": 2
                },
                "data": ["a", "b"]
            })
        );
    }
}
