//! Shared fixtures for cache integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gallery_core::error::FetchFailure;
use gallery_core::image::{ImageSummary, Page};
use gallery_core::query::SearchQuery;
use gallery_core::source::ImageSource;
use gallery_core::types::ImageId;

pub fn image(id: ImageId) -> ImageSummary {
    ImageSummary {
        id,
        thumbnail_url: format!("https://cdn.example/{id}_640.jpg"),
        full_url: format!("https://cdn.example/{id}_1280.jpg"),
        tags: "nature, water".into(),
        user: "photographer".into(),
        user_image_url: String::new(),
        views: 10,
        likes: 2,
        comments: 0,
        downloads: 4,
        favorites: 1,
        width: None,
        height: None,
        size_bytes: None,
        kind: None,
    }
}

/// Deterministic in-memory catalog.
///
/// Every query matches `total_hits` images (500 unless overridden per
/// search text). Failures queued with [`FakeSource::fail_next`] are
/// returned before any page is served, and `latency` makes each call
/// suspend so concurrent callers can overlap.
pub struct FakeSource {
    total_hits: HashMap<String, u64>,
    default_total_hits: u64,
    latency: Option<Duration>,
    failures: Mutex<VecDeque<FetchFailure>>,
    calls: Mutex<Vec<(String, u32)>>,
    image_calls: Mutex<u32>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            total_hits: HashMap::new(),
            default_total_hits: 500,
            latency: None,
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            image_calls: Mutex::new(0),
        }
    }

    pub fn with_total_hits(mut self, text: &str, total_hits: u64) -> Self {
        self.total_hits.insert(text.to_string(), total_hits);
        self
    }

    pub fn with_default_total_hits(mut self, total_hits: u64) -> Self {
        self.default_total_hits = total_hits;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_next(&self, failure: FetchFailure) {
        self.failures.lock().unwrap().push_back(failure);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, text: &str) -> Vec<u32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == text)
            .map(|(_, page)| *page)
            .collect()
    }

    pub fn image_calls(&self) -> u32 {
        *self.image_calls.lock().unwrap()
    }

    fn build_page(&self, query: &SearchQuery, page: u32) -> Page {
        let total_hits = self
            .total_hits
            .get(query.search_text())
            .copied()
            .unwrap_or(self.default_total_hits);
        let size = u64::from(query.page_size());
        let start = u64::from(page - 1) * size;
        let end = (start + size).min(total_hits);
        let items = (start..end.max(start)).map(|i| image(i + 1)).collect();
        Page {
            number: page,
            items,
            total: total_hits,
            total_hits,
        }
    }
}

#[async_trait]
impl ImageSource for FakeSource {
    async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Result<Page, FetchFailure> {
        self.calls
            .lock()
            .unwrap()
            .push((query.search_text().to_string(), page));
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(failure) = self.failures.lock().unwrap().pop_front() {
            return Err(failure);
        }
        Ok(self.build_page(query, page))
    }

    async fn fetch_image(&self, id: ImageId) -> Result<ImageSummary, FetchFailure> {
        *self.image_calls.lock().unwrap() += 1;
        if let Some(failure) = self.failures.lock().unwrap().pop_front() {
            return Err(failure);
        }
        Ok(image(id))
    }
}
