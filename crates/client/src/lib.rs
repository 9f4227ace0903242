//! HTTP client for the image-search API.
//!
//! Provides environment-driven configuration, a [`reqwest`] transport that
//! speaks the Pixabay-style wire format, and the [`fetcher::PageFetcher`]
//! that layers retry and response validation on top of any transport.

pub mod config;
pub mod fetcher;
pub mod transport;
