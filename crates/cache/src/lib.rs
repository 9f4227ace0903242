//! In-memory caching for the gallery feed.
//!
//! [`query_cache::QueryCache`] owns every paginated result set and is the
//! only mutable shared state in the feed. [`feed::Feed`] drives it from
//! scroll-sentinel signals for a single consumer, and
//! [`detail_cache::DetailCache`] serves single-image lookups.

pub mod config;
pub mod detail_cache;
pub mod feed;
pub mod query_cache;
pub mod snapshot;
