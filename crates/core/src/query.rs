//! Search query values and the cache key derived from them.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pagination bounds
// ---------------------------------------------------------------------------

/// Default number of images per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Smallest page size this client will request.
pub const MIN_PAGE_SIZE: u32 = 10;

/// Largest page size this client will request. The remote accepts up to
/// 200, but larger pages make the grid stutter on slow connections.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Hard ceiling on images retrievable for a single query, whatever the
/// server reports as available.
pub const GLOBAL_RESULT_CAP: u64 = 500;

/// Clamp a caller-provided page size into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(size: u32) -> u32 {
    size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Clamp a page number to be at least 1.
pub fn clamp_page(page: u32) -> u32 {
    page.max(1)
}

/// Normalize free text for use in a cache key.
///
/// - Trims leading/trailing whitespace.
/// - Collapses internal whitespace runs to a single space.
/// - Lowercases.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// Identity of one paginated result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QueryKey {
    pub text: String,
    pub page_size: u32,
}

/// An immutable search request: free text plus a page size.
///
/// The page size is clamped on construction. The text is kept as typed
/// and sent that way; only [`SearchQuery::key`] normalizes it, so two
/// queries that differ only in spacing or case share a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchQuery {
    text: String,
    page_size: u32,
}

impl SearchQuery {
    pub fn new(text: &str, page_size: u32) -> Self {
        Self {
            text: text.to_string(),
            page_size: clamp_page_size(page_size),
        }
    }

    /// A query with the default page size.
    pub fn text(text: &str) -> Self {
        Self::new(text, DEFAULT_PAGE_SIZE)
    }

    /// Text as typed, used for the request.
    pub fn search_text(&self) -> &str {
        &self.text
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn key(&self) -> QueryKey {
        QueryKey {
            text: normalize_text(&self.text),
            page_size: self.page_size,
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new("", DEFAULT_PAGE_SIZE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
