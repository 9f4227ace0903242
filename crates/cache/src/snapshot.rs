//! Read-only view of one query's cached state, handed to consumers.

use gallery_core::error::FetchFailure;
use gallery_core::image::ImageSummary;
use serde::Serialize;

/// Flattened, immutable copy of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// All items of all fetched pages, in page order.
    pub items: Vec<ImageSummary>,
    /// A fetch for this query is in flight.
    pub loading: bool,
    /// Most recent failure, cleared by the next successful fetch.
    pub error: Option<FetchFailure>,
    pub has_more: bool,
    pub pages_loaded: u32,
    /// `totalHits` reported with the most recent page.
    pub total_hits: Option<u64>,
}

/// What a consumer should render for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing to show yet; render placeholders.
    InitialLoading,
    /// A failure with nothing loaded: render a full-page error.
    FullPageError,
    /// The query matched nothing.
    Empty,
    /// Render the items, plus a spinner and/or retry affordance at the end.
    Items {
        loading_more: bool,
        show_retry: bool,
        end_of_results: bool,
    },
}

impl Snapshot {
    /// A snapshot of a query nothing is known about yet.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: true,
            pages_loaded: 0,
            total_hits: None,
        }
    }

    pub fn view(&self) -> ViewState {
        if self.items.is_empty() {
            if self.loading {
                return ViewState::InitialLoading;
            }
            if self.error.is_some() {
                return ViewState::FullPageError;
            }
            if self.pages_loaded == 0 {
                return ViewState::InitialLoading;
            }
            return ViewState::Empty;
        }
        ViewState::Items {
            loading_more: self.loading,
            show_retry: self.error.is_some(),
            end_of_results: !self.has_more,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: u64) -> ImageSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "webformatURL": "",
            "largeImageURL": "",
            "user": "u",
            "views": 0, "likes": 0, "comments": 0, "downloads": 0, "favorites": 0
        }))
        .unwrap()
    }

    #[test]
    fn error_without_items_is_full_page() {
        let snap = Snapshot {
            error: Some(FetchFailure::network("down")),
            ..Snapshot::empty()
        };
        assert_eq!(snap.view(), ViewState::FullPageError);
    }

    #[test]
    fn error_with_items_offers_retry() {
        let snap = Snapshot {
            items: vec![image(1)],
            error: Some(FetchFailure::http(500, "oops")),
            pages_loaded: 1,
            ..Snapshot::empty()
        };
        assert_eq!(
            snap.view(),
            ViewState::Items {
                loading_more: false,
                show_retry: true,
                end_of_results: false,
            }
        );
    }

    #[test]
    fn loaded_but_no_hits_is_empty() {
        let snap = Snapshot {
            has_more: false,
            pages_loaded: 1,
            total_hits: Some(0),
            ..Snapshot::empty()
        };
        assert_eq!(snap.view(), ViewState::Empty);
    }

    #[test]
    fn nothing_yet_is_initial_loading() {
        assert_eq!(Snapshot::empty().view(), ViewState::InitialLoading);
        let loading = Snapshot {
            loading: true,
            ..Snapshot::empty()
        };
        assert_eq!(loading.view(), ViewState::InitialLoading);
    }
}
