//! Paginated query cache.
//!
//! One [`CacheEntry`] per [`QueryKey`], holding the pages fetched so far in
//! ascending order. All interaction goes through
//! [`QueryCache::get_or_fetch_next_page`], which is safe to call on every
//! scroll signal: it serves fresh cached pages without a request and never
//! has more than one fetch in flight per key.
//!
//! The state mutex is only held between suspension points, never across
//! the network call, so each mutation is one short critical section.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use gallery_core::clock::{Clock, SystemClock};
use gallery_core::error::FetchFailure;
use gallery_core::image::Page;
use gallery_core::pagination::PaginationState;
use gallery_core::query::{QueryKey, SearchQuery};
use gallery_core::source::ImageSource;
use gallery_core::types::Timestamp;

use crate::config::CacheConfig;
use crate::snapshot::Snapshot;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Marker for the single outstanding fetch of an entry.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    page: u32,
    generation: u64,
}

/// Everything cached for one query key.
#[derive(Debug)]
struct CacheEntry {
    query: SearchQuery,
    /// Ascending by page number, append-only until the entry goes stale.
    pages: Vec<Page>,
    /// Time of the last successful append.
    fetched_at: Option<Timestamp>,
    last_accessed: Timestamp,
    in_flight: Option<InFlight>,
    error: Option<FetchFailure>,
}

impl CacheEntry {
    fn new(query: SearchQuery, now: Timestamp) -> Self {
        Self {
            query,
            pages: Vec::new(),
            fetched_at: None,
            last_accessed: now,
            in_flight: None,
            error: None,
        }
    }

    fn is_stale(&self, now: Timestamp, config: &CacheConfig) -> bool {
        self.fetched_at
            .is_some_and(|at| now - at >= config.stale_time)
    }

    fn is_idle(&self, now: Timestamp, config: &CacheConfig) -> bool {
        self.in_flight.is_none() && now - self.last_accessed >= config.gc_time
    }

    fn pagination(&self, config: &CacheConfig) -> PaginationState {
        PaginationState::compute(&self.pages, self.query.page_size(), config.global_cap)
    }

    fn snapshot(&self, config: &CacheConfig) -> Snapshot {
        let pagination = self.pagination(config);
        Snapshot {
            items: self
                .pages
                .iter()
                .flat_map(|p| p.items.iter().cloned())
                .collect(),
            loading: self.in_flight.is_some(),
            error: self.error.clone(),
            has_more: pagination.has_more,
            pages_loaded: self.pages.len() as u32,
            total_hits: self.pages.last().map(|p| p.total_hits),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    active: Option<QueryKey>,
    /// Bumped every time the active key changes.
    generation: u64,
}

impl CacheState {
    /// Make `key` the active key, bumping the generation if it changed.
    fn activate(&mut self, key: &QueryKey) -> u64 {
        if self.active.as_ref() != Some(key) {
            self.generation += 1;
            tracing::debug!(
                query = %key.text,
                page_size = key.page_size,
                generation = self.generation,
                "Active query changed",
            );
            self.active = Some(key.clone());
        }
        self.generation
    }
}

// ---------------------------------------------------------------------------
// QueryCache
// ---------------------------------------------------------------------------

/// Owns all paginated result sets and coordinates fetching them.
///
/// Designed to be wrapped in an `Arc` and shared by the consumers of one
/// view. The cache tracks a single *active* key: the last one asked for.
/// A fetch started for a key that is no longer active when it completes is
/// discarded.
pub struct QueryCache<S: ?Sized> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl<S: ImageSource + ?Sized> QueryCache<S> {
    pub fn new(source: Arc<S>, config: CacheConfig) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Replace the time source (tests use a manual clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return a snapshot of `query` holding at least `through_page` pages,
    /// fetching the next page if needed.
    ///
    /// - Fresh entry already holding `through_page` pages: cached snapshot.
    /// - Fetch already in flight for the key: snapshot with `loading`.
    /// - No more pages: snapshot, no request.
    /// - Otherwise one request for the tracker's next page.
    ///
    /// Never fails; a failed fetch is reported in [`Snapshot::error`] and
    /// leaves the fetched pages untouched.
    pub async fn get_or_fetch_next_page(&self, query: &SearchQuery, through_page: u32) -> Snapshot {
        let key = query.key();
        let page = {
            let mut state = self.lock();
            let now = self.clock.now();
            let generation = state.activate(&key);
            self.collect_garbage_locked(&mut state, now);

            let entry = state
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(query.clone(), now));
            entry.last_accessed = now;

            if entry.in_flight.is_none() && entry.is_stale(now, &self.config) {
                tracing::debug!(query = %key.text, "Cache entry is stale, refetching from page 1");
                *entry = CacheEntry::new(query.clone(), now);
            }

            if let Some(in_flight) = entry.in_flight {
                tracing::trace!(query = %key.text, page = in_flight.page, "Fetch already in flight");
                return entry.snapshot(&self.config);
            }

            if entry.pages.len() as u32 >= through_page.max(1) {
                return entry.snapshot(&self.config);
            }

            let pagination = entry.pagination(&self.config);
            let Some(page) = pagination.next_page_param() else {
                return entry.snapshot(&self.config);
            };

            entry.in_flight = Some(InFlight { page, generation });
            page
        };

        let result = self.source.fetch_page(query, page).await;

        let mut state = self.lock();
        let now = self.clock.now();
        let current_generation = state.generation;
        let Some(entry) = state.entries.get_mut(&key) else {
            return Snapshot::empty();
        };
        let started = entry.in_flight.take();

        if started.map(|f| f.generation) != Some(current_generation) {
            tracing::debug!(
                query = %key.text,
                page,
                "Discarding result for superseded query",
            );
            return entry.snapshot(&self.config);
        }

        match result {
            Ok(fetched) if fetched.number as usize == entry.pages.len() + 1 => {
                tracing::debug!(
                    query = %key.text,
                    page = fetched.number,
                    items = fetched.len(),
                    "Appended page",
                );
                entry.pages.push(fetched);
                entry.fetched_at = Some(now);
                entry.error = None;
            }
            Ok(fetched) => {
                tracing::warn!(
                    query = %key.text,
                    expected = entry.pages.len() + 1,
                    got = fetched.number,
                    "Out-of-order page dropped",
                );
            }
            Err(failure) => {
                tracing::warn!(query = %key.text, page, error = %failure, "Page fetch failed");
                entry.error = Some(failure);
            }
        }

        entry.snapshot(&self.config)
    }

    /// Current snapshot of `query` without fetching or touching its
    /// access time.
    pub fn snapshot(&self, query: &SearchQuery) -> Option<Snapshot> {
        let state = self.lock();
        state
            .entries
            .get(&query.key())
            .map(|e| e.snapshot(&self.config))
    }

    /// Page numbers currently cached for `query`, in storage order.
    pub fn page_numbers(&self, query: &SearchQuery) -> Vec<u32> {
        let state = self.lock();
        state
            .entries
            .get(&query.key())
            .map(|e| e.pages.iter().map(|p| p.number).collect())
            .unwrap_or_default()
    }

    /// Drop the entry for `query` so the next access starts from page 1.
    ///
    /// Returns `false` (and keeps the entry) while a fetch is in flight.
    pub fn invalidate(&self, query: &SearchQuery) -> bool {
        let mut state = self.lock();
        let key = query.key();
        match state.entries.get(&key) {
            Some(entry) if entry.in_flight.is_some() => false,
            Some(_) => {
                state.entries.remove(&key);
                true
            }
            None => true,
        }
    }

    /// Remove entries idle for longer than the GC time. The active entry
    /// and entries with a fetch in flight are kept. Returns how many were
    /// removed.
    pub fn collect_garbage(&self) -> usize {
        let mut state = self.lock();
        let now = self.clock.now();
        self.collect_garbage_locked(&mut state, now)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- private helpers ----

    fn collect_garbage_locked(&self, state: &mut CacheState, now: Timestamp) -> usize {
        let before = state.entries.len();
        let active = state.active.clone();
        state
            .entries
            .retain(|key, entry| Some(key) == active.as_ref() || !entry.is_idle(now, &self.config));
        let removed = before - state.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Garbage-collected idle cache entries");
        }
        removed
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
