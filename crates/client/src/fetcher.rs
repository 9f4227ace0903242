//! Page fetcher: sanitize, send, retry, validate.
//!
//! [`PageFetcher`] is the only place that decides whether a failed request
//! is tried again. Transient failures (network, timeout) are retried with
//! exponential backoff per [`RetryPolicy`]; HTTP errors and malformed
//! bodies surface on the first occurrence.

use async_trait::async_trait;
use gallery_core::error::FetchFailure;
use gallery_core::image::{ImageSummary, Page};
use gallery_core::query::{clamp_page, clamp_page_size, SearchQuery};
use gallery_core::retry::RetryPolicy;
use gallery_core::source::ImageSource;
use gallery_core::types::ImageId;
use gallery_core::validation::{validate_image, validate_page};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::transport::{ApiRequest, HttpTransport, Transport, TransportError};

/// Fetches validated pages and images through a [`Transport`].
pub struct PageFetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl PageFetcher<HttpTransport> {
    /// Build a fetcher over HTTP with the default retry policy.
    pub fn from_config(config: ApiConfig) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch page `page` of `query`.
    ///
    /// The page number is raised to at least 1 and the page size is
    /// clamped again here, whatever the caller did.
    pub async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<Page, FetchFailure> {
        let page = clamp_page(page);
        let per_page = clamp_page_size(query.page_size());
        let request = ApiRequest::Search {
            text: query.search_text().to_string(),
            page,
            per_page,
        };

        let payload = self.send_with_retry(&request).await?;
        let fetched = validate_page(page, &payload).map_err(|e| {
            tracing::error!(page, query = query.search_text(), error = %e, "Invalid page payload");
            FetchFailure::from(e)
        })?;

        if fetched.is_empty() && fetched.total_hits > 0 {
            tracing::warn!(
                page,
                total_hits = fetched.total_hits,
                "Got empty page despite totalHits > 0",
            );
        }

        tracing::debug!(
            page,
            per_page,
            query = query.search_text(),
            received = fetched.len(),
            total_hits = fetched.total_hits,
            first_id = fetched.items.first().map(|i| i.id),
            last_id = fetched.items.last().map(|i| i.id),
            "Fetched page",
        );

        Ok(fetched)
    }

    /// Fetch one image by id, validated as a bare image object.
    pub async fn fetch_image(&self, id: ImageId) -> Result<ImageSummary, FetchFailure> {
        let payload = self.send_with_retry(&ApiRequest::Image { id }).await?;
        let image = validate_image(&payload).map_err(|e| {
            tracing::error!(id, error = %e, "Invalid image payload");
            FetchFailure::from(e)
        })?;
        tracing::debug!(id = image.id, "Fetched image");
        Ok(image)
    }

    /// Send `request`, retrying transient failures per the policy.
    async fn send_with_retry(&self, request: &ApiRequest) -> Result<Value, FetchFailure> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let failure = match self.transport.get_json(request).await {
                Ok(payload) => return Ok(payload),
                Err(e) => FetchFailure::from(e),
            };

            if failure.is_unauthorized() {
                tracing::warn!(?request, "Unauthorized; credentials must be refreshed");
                return Err(failure);
            }

            match self.policy.delay_after(attempt, failure.kind) {
                Some(delay) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "API request failed, retrying",
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(attempt, ?request, error = %failure, "API request failed");
                    return Err(failure);
                }
            }
        }
    }
}

#[async_trait]
impl<T: Transport> ImageSource for PageFetcher<T> {
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<Page, FetchFailure> {
        PageFetcher::fetch_page(self, query, page).await
    }

    async fn fetch_image(&self, id: ImageId) -> Result<ImageSummary, FetchFailure> {
        PageFetcher::fetch_image(self, id).await
    }
}
