//! The seam between the cache and whatever produces pages.

use async_trait::async_trait;

use crate::error::FetchFailure;
use crate::image::{ImageSummary, Page};
use crate::query::SearchQuery;
use crate::types::ImageId;

/// Something that can fetch validated pages and single images.
///
/// Implementations own transport, retry and validation; callers only ever
/// see a validated value or a typed [`FetchFailure`].
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch page `page` (1-based) of `query`.
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<Page, FetchFailure>;

    /// Fetch one image by id.
    async fn fetch_image(&self, id: ImageId) -> Result<ImageSummary, FetchFailure>;
}
