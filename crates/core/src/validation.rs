//! Shape checks for raw API payloads.
//!
//! The remote API (or a mock standing in for it) is not bound by a schema,
//! so every decoded body passes through here before it can reach the
//! cache. Checks run in a fixed order and stop at the first violation.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchFailure;
use crate::image::{ImageSummary, Page};

/// Reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedResponse {
    #[error("payload is not an object")]
    NotAnObject,

    #[error("payload has no `hits` field")]
    MissingHits,

    #[error("`hits` is not a list")]
    HitsNotAList,

    #[error("`totalHits` is missing or not a non-negative number")]
    InvalidTotalHits,

    #[error("hit {index} is invalid: {reason}")]
    InvalidHit { index: usize, reason: String },

    #[error("image `id` is missing or not a positive integer")]
    InvalidImageId,

    #[error("image is invalid: {0}")]
    InvalidImage(String),
}

impl From<MalformedResponse> for FetchFailure {
    fn from(err: MalformedResponse) -> Self {
        FetchFailure::malformed(err.to_string())
    }
}

/// Validate a list-endpoint payload and build page `number` from it.
///
/// `total` falls back to `totalHits` when the server omits it.
pub fn validate_page(number: u32, payload: &Value) -> Result<Page, MalformedResponse> {
    let obj = payload.as_object().ok_or(MalformedResponse::NotAnObject)?;
    let hits = obj.get("hits").ok_or(MalformedResponse::MissingHits)?;
    let hits = hits.as_array().ok_or(MalformedResponse::HitsNotAList)?;
    let total_hits = obj
        .get("totalHits")
        .and_then(non_negative_count)
        .ok_or(MalformedResponse::InvalidTotalHits)?;
    let total = obj
        .get("total")
        .and_then(non_negative_count)
        .unwrap_or(total_hits);

    let items = hits
        .iter()
        .enumerate()
        .map(|(index, hit)| {
            ImageSummary::deserialize(hit).map_err(|e| MalformedResponse::InvalidHit {
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        number,
        items,
        total,
        total_hits,
    })
}

/// Validate a detail-endpoint payload: one bare image object.
pub fn validate_image(payload: &Value) -> Result<ImageSummary, MalformedResponse> {
    let obj = payload.as_object().ok_or(MalformedResponse::NotAnObject)?;
    match obj.get("id").and_then(Value::as_u64) {
        Some(id) if id > 0 => {}
        _ => return Err(MalformedResponse::InvalidImageId),
    }
    ImageSummary::deserialize(payload)
        .map_err(|e| MalformedResponse::InvalidImage(e.to_string()))
}

/// Accept integral JSON numbers >= 0. Floats with no fractional part are
/// tolerated because some mocks emit `500.0`.
fn non_negative_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn hit(id: u64) -> Value {
        json!({
            "id": id,
            "webformatURL": format!("https://cdn.example/{id}_640.jpg"),
            "largeImageURL": format!("https://cdn.example/{id}_1280.jpg"),
            "tags": "sky, cloud",
            "user": "someone",
            "userImageURL": "",
            "views": 10,
            "likes": 1,
            "comments": 0,
            "downloads": 3,
            "favorites": 2
        })
    }

    #[test]
    fn accepts_well_formed_page() {
        let payload = json!({ "total": 9000, "totalHits": 500, "hits": [hit(1), hit(2)] });
        let page = validate_page(3, &payload).unwrap();
        assert_eq!(page.number, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page.total, 9000);
        assert_eq!(page.total_hits, 500);
    }

    #[test]
    fn total_defaults_to_total_hits() {
        let payload = json!({ "totalHits": 42, "hits": [] });
        let page = validate_page(1, &payload).unwrap();
        assert_eq!(page.total, 42);
        assert!(page.is_empty());
    }

    #[test]
    fn rejects_null_and_primitives() {
        assert_eq!(validate_page(1, &Value::Null), Err(MalformedResponse::NotAnObject));
        assert_eq!(validate_page(1, &json!(12)), Err(MalformedResponse::NotAnObject));
        assert_eq!(validate_page(1, &json!([])), Err(MalformedResponse::NotAnObject));
    }

    #[test]
    fn rejects_missing_hits() {
        let payload = json!({ "totalHits": 5 });
        assert_eq!(validate_page(1, &payload), Err(MalformedResponse::MissingHits));
    }

    #[test]
    fn rejects_hits_that_are_not_a_list() {
        let payload = json!({ "hits": "not-a-list", "totalHits": 5 });
        assert_eq!(validate_page(1, &payload), Err(MalformedResponse::HitsNotAList));

        let payload = json!({ "hits": { "0": hit(1) }, "totalHits": 5 });
        assert_eq!(validate_page(1, &payload), Err(MalformedResponse::HitsNotAList));
    }

    #[test]
    fn rejects_bad_total_hits() {
        for bad in [json!(null), json!(-1), json!("500"), json!(1.5)] {
            let payload = json!({ "hits": [], "totalHits": bad });
            assert_eq!(validate_page(1, &payload), Err(MalformedResponse::InvalidTotalHits));
        }
        let payload = json!({ "hits": [] });
        assert_eq!(validate_page(1, &payload), Err(MalformedResponse::InvalidTotalHits));
    }

    #[test]
    fn integral_float_total_hits_is_accepted() {
        let payload = json!({ "hits": [], "totalHits": 500.0 });
        assert_eq!(validate_page(1, &payload).unwrap().total_hits, 500);
    }

    #[test]
    fn checks_run_in_order() {
        // Both `hits` and `totalHits` are wrong; the list check comes first.
        let payload = json!({ "hits": 7, "totalHits": -3 });
        assert_eq!(validate_page(1, &payload), Err(MalformedResponse::HitsNotAList));
    }

    #[test]
    fn reports_index_of_bad_hit() {
        let mut bad = hit(2);
        bad["views"] = json!(-4);
        let payload = json!({ "hits": [hit(1), bad], "totalHits": 2 });
        assert_matches!(
            validate_page(1, &payload),
            Err(MalformedResponse::InvalidHit { index: 1, .. })
        );
    }

    #[test]
    fn image_requires_positive_id() {
        let mut value = hit(0);
        assert_eq!(validate_image(&value), Err(MalformedResponse::InvalidImageId));
        value.as_object_mut().unwrap().remove("id");
        assert_eq!(validate_image(&value), Err(MalformedResponse::InvalidImageId));
    }

    #[test]
    fn image_rejects_wrapped_payload() {
        let payload = json!({ "hits": [hit(5)], "totalHits": 1 });
        assert_eq!(validate_image(&payload), Err(MalformedResponse::InvalidImageId));
    }

    #[test]
    fn image_accepts_bare_object() {
        let image = validate_image(&hit(77)).unwrap();
        assert_eq!(image.id, 77);
    }

    #[test]
    fn converts_into_malformed_failure() {
        let failure: FetchFailure = MalformedResponse::HitsNotAList.into();
        assert_eq!(failure.kind, crate::error::FailureKind::Malformed);
        assert!(failure.message.contains("not a list"));
    }
}
