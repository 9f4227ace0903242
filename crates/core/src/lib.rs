//! Domain layer for the image gallery feed.
//!
//! Everything in this crate is free of IO: the data model, response
//! validation, pagination arithmetic, retry timing, the scroll trigger
//! state machine and the [`source::ImageSource`] seam that the HTTP
//! client implements and the cache consumes.

pub mod clock;
pub mod error;
pub mod image;
pub mod pagination;
pub mod query;
pub mod retry;
pub mod scroll;
pub mod source;
pub mod types;
pub mod validation;
