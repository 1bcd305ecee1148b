//! Pagination-related DTOs for API responses.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic paged response wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResponse<T> {
    /// The data items for this page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: u32,

    /// Number of items per page
    #[schema(example = 10)]
    pub page_size: u32,

    /// Total number of items across all pages
    #[schema(example = 42)]
    pub total_items: u64,

    /// Total number of pages
    #[schema(example = 5)]
    pub total_pages: u32,

    /// Whether there is a next page
    #[schema(example = true)]
    pub has_next: bool,

    /// Whether there is a previous page
    #[schema(example = false)]
    pub has_prev: bool,
}

impl<T> PagedResponse<T> {
    /// Creates a new paged response.
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            pagination: PaginationMeta {
                page,
                page_size,
                total_items,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_response_meta() {
        let response = PagedResponse::new(vec![1, 2, 3], 1, 10, 23);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_next);
        assert!(!response.pagination.has_prev);

        let last = PagedResponse::new(vec![21, 22, 23], 3, 10, 23);
        assert!(!last.pagination.has_next);
        assert!(last.pagination.has_prev);
    }

    #[test]
    fn test_paged_response_empty() {
        let response = PagedResponse::<i32>::new(vec![], 1, 10, 0);
        assert_eq!(response.pagination.total_pages, 0);
        assert!(!response.pagination.has_next);
    }
}
