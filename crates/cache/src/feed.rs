//! Infinite-scroll feed for a single consumer.
//!
//! [`Feed`] couples a [`ScrollTrigger`] to the shared [`QueryCache`]: the
//! consumer reports search changes and sentinel visibility, and reads back
//! the latest [`Snapshot`]. While the snapshot carries an error the
//! sentinel is ignored; only an explicit [`Feed::retry`] tries again.

use std::sync::Arc;

use gallery_core::query::SearchQuery;
use gallery_core::scroll::{ScrollTrigger, TriggerAction};
use gallery_core::source::ImageSource;

use crate::query_cache::QueryCache;
use crate::snapshot::Snapshot;

pub struct Feed<S: ?Sized> {
    cache: Arc<QueryCache<S>>,
    query: SearchQuery,
    trigger: ScrollTrigger,
    snapshot: Snapshot,
}

impl<S: ImageSource + ?Sized> Feed<S> {
    pub fn new(cache: Arc<QueryCache<S>>) -> Self {
        Self {
            cache,
            query: SearchQuery::default(),
            trigger: ScrollTrigger::new(),
            snapshot: Snapshot::empty(),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    /// Switch to `query` (already debounced by the caller) and load its
    /// first page, or serve it from cache.
    pub async fn set_query(&mut self, query: SearchQuery) -> &Snapshot {
        if query.key() != self.query.key() {
            self.trigger.reset();
        }
        self.query = query;
        self.snapshot = self.cache.get_or_fetch_next_page(&self.query, 1).await;
        &self.snapshot
    }

    /// Report the scroll sentinel's visibility.
    ///
    /// Loads at most one page per call.
    pub async fn on_sentinel(&mut self, visible: bool) -> &Snapshot {
        self.refresh_if_loading();
        if self.snapshot.error.is_some() {
            return &self.snapshot;
        }
        let action = self
            .trigger
            .observe(visible, self.snapshot.loading, self.snapshot.has_more);
        if action == TriggerAction::LoadMore {
            self.load_next().await;
            self.trigger.settle(self.snapshot.has_more);
        }
        &self.snapshot
    }

    /// Manually retry after a failure. A fresh attempt with its own retry
    /// budget; does nothing when the snapshot has no error.
    pub async fn retry(&mut self) -> &Snapshot {
        self.refresh_if_loading();
        if self.snapshot.error.is_some() {
            tracing::info!(query = self.query.search_text(), "Retrying after failure");
            self.load_next().await;
        }
        &self.snapshot
    }

    /// A `loading` snapshot may belong to a fetch another consumer of the
    /// shared cache started; pick up whatever that fetch left behind.
    fn refresh_if_loading(&mut self) {
        if !self.snapshot.loading {
            return;
        }
        if let Some(current) = self.cache.snapshot(&self.query) {
            self.snapshot = current;
        }
    }

    async fn load_next(&mut self) {
        let through_page = self.snapshot.pages_loaded + 1;
        self.snapshot = self
            .cache
            .get_or_fetch_next_page(&self.query, through_page)
            .await;
    }
}
