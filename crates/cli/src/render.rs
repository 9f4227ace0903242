//! Plain-text rendering of feed snapshots and image details.

use std::fmt::Write;

use gallery_cache::snapshot::{Snapshot, ViewState};
use gallery_core::image::ImageSummary;

/// Format a counter with thousands separators, e.g. `12,345`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One grid card as a single line.
pub fn render_card(image: &ImageSummary) -> String {
    format!(
        "#{:<9} {:<20} likes {:>7}  downloads {:>7}  comments {:>5}  views {:>9}",
        image.id,
        image.user,
        format_count(image.likes),
        format_count(image.downloads),
        format_count(image.comments),
        format_count(image.views),
    )
}

/// Render the items added since `shown` plus the feed status line.
pub fn render_feed(snapshot: &Snapshot, shown: usize) -> String {
    let mut out = String::new();
    match snapshot.view() {
        ViewState::InitialLoading => out.push_str("Loading images...\n"),
        ViewState::FullPageError => {
            let message = snapshot
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            let _ = writeln!(out, "Failed to load images: {message}");
            out.push_str("Type :retry to try again.\n");
        }
        ViewState::Empty => {
            out.push_str("No images found. Try adjusting your search.\n");
        }
        ViewState::Items {
            loading_more,
            show_retry,
            end_of_results,
        } => {
            for image in snapshot.items.iter().skip(shown) {
                out.push_str(&render_card(image));
                out.push('\n');
            }
            let total = snapshot
                .total_hits
                .map(|t| format!(" of {}", format_count(t)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "-- {} images{total} --",
                format_count(snapshot.items.len() as u64)
            );
            if loading_more {
                out.push_str("Loading more...\n");
            }
            if show_retry {
                if let Some(error) = &snapshot.error {
                    let _ = writeln!(out, "Could not load more: {error}. Type :retry.");
                }
            } else if end_of_results {
                out.push_str("End of results.\n");
            } else {
                out.push_str("Type :more to load more.\n");
            }
        }
    }
    out
}

/// The detail view for one image.
pub fn render_detail(image: &ImageSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Image #{} by {}", image.id, image.user);
    let _ = writeln!(out, "  full:      {}", image.full_url);
    let _ = writeln!(out, "  preview:   {}", image.thumbnail_url);
    if let (Some(w), Some(h)) = (image.width, image.height) {
        let _ = writeln!(out, "  size:      {w}x{h}");
    }
    let tags = image.tag_list();
    if !tags.is_empty() {
        let _ = writeln!(out, "  tags:      {}", tags.join(", "));
    }
    for (label, value) in [
        ("views", image.views),
        ("likes", image.likes),
        ("comments", image.comments),
        ("favorites", image.favorites),
        ("downloads", image.downloads),
    ] {
        let _ = writeln!(out, "  {label:<10} {}", format_count(value));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
