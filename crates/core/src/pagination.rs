//! Page-cursor arithmetic for infinite scrolling.
//!
//! Pure functions over the pages already fetched for one query. The
//! server-reported `totalHits` of the most recent page is trusted even when
//! that page came back short: the last page of a result set may
//! legitimately hold fewer than `page_size` items.

use serde::Serialize;

use crate::image::Page;

/// Cursor state derived from the fetched pages of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    /// Sum of item counts across all fetched pages.
    pub loaded_count: u64,
    /// Page number the next fetch should request.
    pub next_page: u32,
    /// Number of pages reachable under the cap, or `None` before the first
    /// page has reported a total.
    pub total_pages: Option<u32>,
    pub has_more: bool,
}

impl PaginationState {
    /// Compute the cursor for `pages` (ascending by number).
    ///
    /// With no pages, the first fetch is always allowed.
    pub fn compute(pages: &[Page], page_size: u32, global_cap: u64) -> Self {
        let Some(last) = pages.last() else {
            return Self {
                loaded_count: 0,
                next_page: 1,
                total_pages: None,
                has_more: true,
            };
        };

        let loaded_count: u64 = pages.iter().map(|p| p.len() as u64).sum();
        let effective_total = last.total_hits.min(global_cap);
        let total_pages = effective_total.div_ceil(u64::from(page_size.max(1)));
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        let next_page = pages.len() as u32 + 1;
        let has_more = loaded_count < global_cap && next_page <= total_pages;

        Self {
            loaded_count,
            next_page,
            total_pages: Some(total_pages),
            has_more,
        }
    }

    /// Page number to request next, or `None` when the result set is done.
    pub fn next_page_param(&self) -> Option<u32> {
        self.has_more.then_some(self.next_page)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
