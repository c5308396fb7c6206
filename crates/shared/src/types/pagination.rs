//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The items in the current page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(items: Vec<T>, request: &PageRequest, total_count: u64) -> Self {
        let page_size = request.page_size.max(1);
        let total_pages = if total_count == 0 {
            1
        } else {
            total_count.div_ceil(page_size)
        };

        Self {
            items,
            pagination: Pagination {
                total_count,
                page: request.page,
                page_size,
                total_pages,
                has_next: request.page < total_pages,
                has_prev: request.page > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let request = PageRequest {
            page: 3,
            page_size: 20,
        };
        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_first_page_offset() {
        let request = PageRequest::default();
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_envelope_middle_page() {
        let request = PageRequest {
            page: 2,
            page_size: 10,
        };
        let paged = Paginated::new(vec![1, 2, 3], &request, 25);
        assert_eq!(paged.pagination.total_count, 25);
        assert_eq!(paged.pagination.total_pages, 3);
        assert!(paged.pagination.has_next);
        assert!(paged.pagination.has_prev);
    }

    #[test]
    fn test_envelope_single_page() {
        let request = PageRequest::default();
        let paged = Paginated::new(vec![1], &request, 1);
        assert_eq!(paged.pagination.total_pages, 1);
        assert!(!paged.pagination.has_next);
        assert!(!paged.pagination.has_prev);
    }

    #[test]
    fn test_envelope_empty() {
        let request = PageRequest::default();
        let paged = Paginated::new(Vec::<u8>::new(), &request, 0);
        assert_eq!(paged.pagination.total_pages, 1);
        assert!(!paged.pagination.has_next);
    }

    #[test]
    fn test_envelope_exact_boundary() {
        let request = PageRequest {
            page: 2,
            page_size: 10,
        };
        let paged = Paginated::new(vec![0u8; 10], &request, 20);
        assert_eq!(paged.pagination.total_pages, 2);
        assert!(!paged.pagination.has_next);
        assert!(paged.pagination.has_prev);
    }
}
