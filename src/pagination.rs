use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{DEFAULT_PAGE, ListConfig};

/// Page, page size and offset for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSpec {
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
}

impl PaginationSpec {
    /// Read pagination from raw query values.
    ///
    /// `page` and `limit` must be positive integers, otherwise the defaults
    /// apply; `limit` is capped at `config.max_limit`. An explicit `skip`
    /// (any non-negative integer, including 0) wins over the derived
    /// `(page - 1) * limit`. Never fails.
    #[must_use]
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        skip: Option<&str>,
        config: &ListConfig,
    ) -> Self {
        let page = page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(parse_positive)
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        let skip = skip
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or_else(|| (page - 1).saturating_mul(limit));

        Self { page, limit, skip }
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Page metadata returned alongside the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u64,
    pub per_page: u64,
    pub page_count: u64,
    pub skip_count: u64,
    pub item_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Derive page metadata from the total number of matching documents.
    ///
    /// The requested page is not clamped: asking past the last page gives
    /// `has_next_page == false` and an empty data set, not an error.
    #[must_use]
    pub fn new(pagination: &PaginationSpec, item_count: u64) -> Self {
        let page_count = item_count.div_ceil(pagination.limit.max(1));
        Self {
            current_page: pagination.page,
            per_page: pagination.limit,
            page_count,
            skip_count: pagination.skip,
            item_count,
            has_next_page: pagination.page < page_count,
            has_previous_page: pagination.page > 1,
        }
    }
}
