use chrono::Duration;
use gallery_core::query::GLOBAL_RESULT_CAP;

/// Minutes after the last successful fetch before an entry must be refetched.
pub const DEFAULT_STALE_MINUTES: i64 = 5;

/// Minutes an entry may sit unused before it is dropped.
pub const DEFAULT_GC_MINUTES: i64 = 10;

/// Freshness and size limits for the caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which a cached entry is replaced on next access.
    pub stale_time: Duration,
    /// Idle time after which an inactive entry is garbage-collected.
    pub gc_time: Duration,
    /// Maximum number of items retrievable per query.
    pub global_cap: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::minutes(DEFAULT_STALE_MINUTES),
            gc_time: Duration::minutes(DEFAULT_GC_MINUTES),
            global_cap: GLOBAL_RESULT_CAP,
        }
    }
}
