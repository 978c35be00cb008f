//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{ActivityResponse, UserResponse};

/// Pagination query parameters, reusable across all list endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    /// Items per page, capped at 100
    #[serde(default = "default_per_page")]
    #[param(default = 20, maximum = 100)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Zero-based page index as expected by the paginator
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Get limit capped at maximum, never zero
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper, reusable for all list responses
#[derive(Debug, Serialize, ToSchema)]
#[aliases(UserPage = Paginated<UserResponse>, ActivityPage = Paginated<ActivityResponse>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Build a page from already-mapped items and the requested params
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        let total_pages = total.div_ceil(per_page);

        Self {
            data,
            meta: PaginationMeta {
                page: params.page.max(1),
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index_and_limit() {
        let params = PaginationParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.page_index(), 2);
        assert_eq!(params.limit(), 10);

        let oversized = PaginationParams {
            page: 0,
            per_page: 5_000,
        };
        assert_eq!(oversized.page_index(), 0);
        assert_eq!(oversized.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_query_uses_camel_case() {
        let params: PaginationParams = serde_json::from_str(r#"{"page": 2, "perPage": 5}"#).unwrap();
        assert_eq!(
            params,
            PaginationParams {
                page: 2,
                per_page: 5
            }
        );

        let defaults: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, PaginationParams::default());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        let page = Paginated::new(vec![1, 2, 3], &params, 41);
        assert_eq!(page.meta.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], &params, 0);
        assert_eq!(empty.meta.total_pages, 0);
    }
}
