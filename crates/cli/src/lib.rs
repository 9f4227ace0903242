//! `gallery-cli` library crate.
//!
//! Terminal-side collaborators of the feed: input parsing, search
//! debouncing and text rendering. The binary entrypoint lives in
//! `main.rs`.

pub mod command;
pub mod debounce;
pub mod render;
