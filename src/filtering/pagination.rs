use serde::Serialize;

use crate::params::QueryParams;
use crate::query::QueryTarget;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// The `(page, pageSize)` pair of one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, never 0
    pub page: u64,
    /// Rows per page, never 0
    pub page_size: u64,
}

impl PageWindow {
    /// Window with zero values replaced by the built-in defaults.
    #[must_use]
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    /// Take `page` and `pageSize` from the query, keeping `self` for anything
    /// missing, non-numeric or non-positive.
    #[must_use]
    pub fn from_params(self, params: &QueryParams) -> Self {
        Self {
            page: positive(params.get("page")).unwrap_or(self.page),
            page_size: positive(params.get("pageSize")).unwrap_or(self.page_size),
        }
    }

    /// Rows to skip before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw?.parse::<u64>().ok().filter(|n| *n > 0)
}

/// Pagination bookkeeping returned with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(window: PageWindow, total: u64) -> Self {
        let page_count = total.div_ceil(window.page_size.max(1));
        Self {
            page: window.page,
            page_size: window.page_size,
            page_count,
            total,
            has_next: window.page < page_count,
            has_prev: window.page > 1 && page_count > 0,
        }
    }
}

/// Count every matching row, then fetch the rows of `window`.
///
/// The count runs on a clone of `query`, before any limit or offset exists.
/// A page past the end is not an error; it simply comes back empty.
///
/// # Errors
///
/// Returns the database error of the count or the fetch, unchanged.
pub async fn paginate<Q: QueryTarget>(
    query: Q,
    window: PageWindow,
) -> Result<(Vec<Q::Row>, PaginationMeta), sea_orm::DbErr> {
    let total = query.count().await?;
    let offset = window.offset();
    tracing::debug!(page = window.page, page_size = window.page_size, offset, total, "Fetching page");

    let rows = query.fetch(window.page_size, offset).await?;
    Ok((rows, PaginationMeta::new(window, total)))
}
