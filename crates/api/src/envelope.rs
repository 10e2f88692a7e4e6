//! Unwrapping of the API's response envelopes.
//!
//! List endpoints answer in one of three shapes depending on whether they
//! paginate:
//!
//! - `{"data": {"data": [...], "current_page": 1, "last_page": 3, "total": 25}}`
//! - `{"data": [...]}`
//! - `[...]`
//!
//! Single-record and action endpoints wrap their payload in `data` or not at
//! all. Both are accepted everywhere.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use serenity_core::models::{Listing, PageInfo};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
struct RawPageMeta {
    current_page: Option<u32>,
    last_page: Option<u32>,
    total: Option<u64>,
}

impl RawPageMeta {
    fn resolve(self, rows: usize) -> PageInfo {
        let current_page = self.current_page.unwrap_or(1);
        PageInfo {
            current_page,
            last_page: self.last_page.unwrap_or(current_page),
            total: self.total.unwrap_or(rows as u64),
        }
    }
}

#[derive(Deserialize)]
struct PageBody<T> {
    data: Vec<T>,
    #[serde(flatten)]
    meta: RawPageMeta,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Flat {
        data: Vec<T>,
        #[serde(flatten)]
        meta: RawPageMeta,
    },
    Nested {
        data: PageBody<T>,
    },
    Bare(Vec<T>),
}

/// Decode a list response in any of the accepted shapes.
///
/// A `null` or missing `data` field is treated as an empty list.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the rows do not match `T`.
pub fn unwrap_list<T: DeserializeOwned>(body: Value) -> Result<Listing<T>, ApiError> {
    if is_empty_data(&body) {
        return Ok(Listing::unpaged(Vec::new()));
    }

    let envelope: ListEnvelope<T> = match serde_json::from_value(body.clone()) {
        Ok(envelope) => envelope,
        Err(_) => {
            // Untagged errors only say "did not match any variant"; decode the
            // innermost array directly to surface the offending field.
            return Err(decode_rows::<T>(body)
                .err()
                .map_or_else(|| shape_error("unrecognised list envelope"), ApiError::Decode));
        }
    };

    let listing = match envelope {
        ListEnvelope::Flat { data, meta } => {
            let page = meta.resolve(data.len());
            Listing { items: data, page }
        }
        ListEnvelope::Nested { data } => {
            let page = data.meta.resolve(data.data.len());
            Listing {
                items: data.data,
                page,
            }
        }
        ListEnvelope::Bare(items) => Listing::unpaged(items),
    };
    Ok(listing)
}

/// Decode a single-record or action response, with or without a `data`
/// wrapper.
///
/// # Errors
///
/// Returns `ApiError::Decode` if neither the wrapped nor the bare body
/// matches `T`.
pub fn unwrap_item<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    if let Value::Object(map) = &body
        && let Some(inner) = map.get("data")
        && !inner.is_null()
        && let Ok(item) = serde_json::from_value::<T>(inner.clone())
    {
        return Ok(item);
    }
    serde_json::from_value(body).map_err(ApiError::from)
}

/// Find a string field at the top level or under `data`.
///
/// Used for loosely-shaped action responses such as login tokens and payment
/// authorization URLs.
#[must_use]
pub fn find_string(body: &Value, keys: &[&str]) -> Option<String> {
    let lookup = |v: &Value| {
        keys.iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_owned))
    };
    lookup(body).or_else(|| body.get("data").and_then(lookup))
}

/// The API's own failure flag on an otherwise successful response.
///
/// Returns the message when the body says `"status": false` or
/// `"success": false`.
#[must_use]
pub fn reported_failure(body: &Value) -> Option<String> {
    let failed = ["status", "success"]
        .iter()
        .any(|k| body.get(*k).and_then(Value::as_bool) == Some(false));
    failed.then(|| message_of(body).unwrap_or_else(|| crate::error::GENERIC_ERROR_MESSAGE.to_string()))
}

/// The `message` field of an error body, if present.
#[must_use]
pub fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

fn is_empty_data(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => match map.get("data") {
            None | Some(Value::Null) => !map.contains_key("current_page"),
            Some(Value::Object(inner)) => matches!(inner.get("data"), None | Some(Value::Null)),
            Some(_) => false,
        },
        _ => false,
    }
}

fn decode_rows<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, serde_json::Error> {
    let rows = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(mut inner)) => inner.remove("data").unwrap_or(Value::Null),
            Some(other) => other,
            None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(rows)
}

fn shape_error(what: &str) -> ApiError {
    ApiError::Decode(<serde_json::Error as serde::de::Error>::custom(what))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn test_nested_paginated_envelope() {
        let listing: Listing<Row> = unwrap_list(json!({
            "data": {
                "data": [{"id": 1}, {"id": 2}],
                "current_page": 2,
                "last_page": 5,
                "total": 42
            }
        }))
        .unwrap();
        assert_eq!(listing.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(
            listing.page,
            PageInfo {
                current_page: 2,
                last_page: 5,
                total: 42
            }
        );
    }

    #[test]
    fn test_nested_empty_is_loaded_empty() {
        let listing: Listing<Row> = unwrap_list(json!({"data": {"data": []}})).unwrap();
        assert!(listing.items.is_empty());
        assert_eq!(listing.page.total, 0);
    }

    #[test]
    fn test_flat_envelope() {
        let listing: Listing<Row> = unwrap_list(json!({"data": [{"id": 7}]})).unwrap();
        assert_eq!(listing.items, vec![Row { id: 7 }]);
        assert_eq!(listing.page, PageInfo::single(1));
    }

    #[test]
    fn test_bare_array() {
        let listing: Listing<Row> = unwrap_list(json!([{"id": 3}, {"id": 4}])).unwrap();
        assert_eq!(listing.items.len(), 2);
    }

    #[test]
    fn test_null_data_is_empty() {
        let listing: Listing<Row> = unwrap_list(json!({"data": null})).unwrap();
        assert!(listing.items.is_empty());
        let listing: Listing<Row> = unwrap_list(json!({"message": "ok"})).unwrap();
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_bad_row_surfaces_field_error() {
        let err = unwrap_list::<Row>(json!({"data": [{"id": "x"}]})).unwrap_err();
        match err {
            ApiError::Decode(e) => assert!(e.to_string().contains("invalid type")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_item_wrapped_and_bare() {
        let wrapped: Row = unwrap_item(json!({"data": {"id": 1}})).unwrap();
        let bare: Row = unwrap_item(json!({"id": 2})).unwrap();
        assert_eq!(wrapped, Row { id: 1 });
        assert_eq!(bare, Row { id: 2 });
    }

    #[test]
    fn test_find_string_top_level_and_nested() {
        let body = json!({"data": {"authorization_url": "https://pay.example/abc"}});
        assert_eq!(
            find_string(&body, &["authorization_url"]).as_deref(),
            Some("https://pay.example/abc")
        );
        let body = json!({"access_token": "t"});
        assert_eq!(
            find_string(&body, &["token", "access_token"]).as_deref(),
            Some("t")
        );
        assert!(find_string(&json!({}), &["token"]).is_none());
    }

    #[test]
    fn test_reported_failure() {
        assert_eq!(
            reported_failure(&json!({"status": false, "message": "Card declined"})).as_deref(),
            Some("Card declined")
        );
        assert!(reported_failure(&json!({"success": false})).is_some());
        assert!(reported_failure(&json!({"status": true, "data": []})).is_none());
        assert!(reported_failure(&json!({"status": "ok"})).is_none());
    }
}
