//! Catalog records as returned by the image-search API.

use serde::{Deserialize, Serialize};

use crate::types::ImageId;

/// One image in the catalog, with its engagement counters.
///
/// Field names on the wire follow the Pixabay response format
/// (`webformatURL`, `userImageURL`, ...). Counters are unsigned so a
/// negative value on the wire fails to decode instead of slipping through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: ImageId,
    /// Medium-sized preview URL used for grid thumbnails.
    #[serde(rename = "webformatURL")]
    pub thumbnail_url: String,
    /// Full-resolution URL used on the detail view.
    #[serde(rename = "largeImageURL")]
    pub full_url: String,
    /// Comma-delimited tag string, e.g. `"cat, animal, pet"`.
    #[serde(default)]
    pub tags: String,
    /// Uploader display name.
    pub user: String,
    /// Uploader avatar URL; empty when the uploader has none.
    #[serde(rename = "userImageURL", default)]
    pub user_image_url: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub downloads: u64,
    pub favorites: u64,
    #[serde(rename = "imageWidth", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "imageHeight", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// File size in bytes.
    #[serde(rename = "imageSize", default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Media type reported by the catalog (`photo`, `illustration`, `vector`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ImageSummary {
    /// Split the tag string into trimmed, non-empty tags.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// One validated batch of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based ordinal of this page within its query.
    pub number: u32,
    pub items: Vec<ImageSummary>,
    /// Total matches the server knows about.
    pub total: u64,
    /// Matches the server is willing to return through paging.
    pub total_hits: u64,
}

impl Page {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
