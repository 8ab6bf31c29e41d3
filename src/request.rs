//! Request parameter extraction.
//!
//! [`RequestSource`] is the builder's window onto an HTTP request: two
//! string-keyed JSON maps, one for the query string and one for the body.
//! Lookups follow a fixed priority (query, body, then the `key[]`
//! multiselect spellings of each) and skip `null` entries, so the first
//! *defined* occurrence wins.
//!
//! The type doubles as an Axum extractor. Extraction never rejects: a
//! missing or malformed body simply leaves the body map empty, matching the
//! builder's silent-no-op treatment of absent filter input.
//!
//! ```rust,ignore
//! async fn list_users(source: RequestSource) -> impl IntoResponse {
//!     let users = QueryBuilder::with_request(source)
//!         .filter_from_request("status")
//!         .search(&["name", "email"])
//!         .paginate(&delegate, None, None)
//!         .await?;
//!     Json(users)
//! }
//! ```

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value, map::Entry};
use std::convert::Infallible;
use std::num::FpCategory;

/// Query and body parameters of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSource {
    query: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_parts(query: Map<String, Value>, body: Map<String, Value>) -> Self {
        Self { query, body }
    }

    /// Adds a query parameter, replacing any previous value under `key`.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds a body parameter, replacing any previous value under `key`.
    #[must_use]
    pub fn with_body_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Looks up `key`, first defined wins: query, body, then the `key[]`
    /// variants of each. `null` entries are skipped.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        let multiselect = format!("{key}[]");
        [
            self.query.get(key),
            self.body.get(key),
            self.query.get(multiselect.as_str()),
            self.body.get(multiselect.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_null())
    }

    /// Whether `key` resolves to a truthy value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.value(key).is_some_and(truthy)
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and the empty string
/// are falsy; arrays and objects are always truthy.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .is_some_and(|float| float.classify() != FpCategory::Zero),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accumulates urlencoded pairs; repeated keys (and explicit `key[]` keys)
/// collect into arrays, single occurrences stay strings.
fn parse_urlencoded(input: &[u8]) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in url::form_urlencoded::parse(input) {
        append_param(&mut params, key.into_owned(), value.into_owned());
    }
    params
}

fn append_param(params: &mut Map<String, Value>, key: String, value: String) {
    match params.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(Value::String(value));
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) => items.push(Value::String(value)),
            single => {
                let first = single.take();
                *single = Value::Array(vec![first, Value::String(value)]);
            }
        },
    }
}

fn json_body(bytes: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(object)) => object,
        Ok(_) => Map::new(),
        Err(error) => {
            tracing::debug!("ignoring malformed json body: {error}");
            Map::new()
        }
    }
}

impl<S> FromRequest<S> for RequestSource
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req
            .uri()
            .query()
            .map_or_else(Map::new, |raw| parse_urlencoded(raw.as_bytes()));

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|header| header.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let is_json = content_type.starts_with("application/json");
        let is_form = content_type.starts_with("application/x-www-form-urlencoded");

        let body = if is_json || is_form {
            match Bytes::from_request(req, state).await {
                Ok(bytes) if is_json => json_body(&bytes),
                Ok(bytes) => parse_urlencoded(&bytes),
                Err(rejection) => {
                    tracing::debug!("request body unavailable: {rejection}");
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self { query, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_priority_query_before_body() {
        let source = RequestSource::new()
            .with_query_param("status", "active")
            .with_body_param("status", "archived");
        assert_eq!(source.value("status"), Some(&json!("active")));
    }

    #[test]
    fn test_value_falls_back_to_multiselect_keys() {
        let source = RequestSource::new().with_body_param("role[]", json!(["a", "b"]));
        assert_eq!(source.value("role"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let source = RequestSource::new()
            .with_query_param("score", Value::Null)
            .with_body_param("score", 7);
        assert_eq!(
            source.value("score"),
            Some(&json!(7)),
            "null query entry should fall through to the body"
        );
        assert_eq!(RequestSource::new().with_body_param("x", Value::Null).value("x"), None);
    }

    #[test]
    fn test_truthiness_matches_javascript() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("0")), "non-empty strings are truthy");
        assert!(truthy(&json!([])), "arrays are truthy even when empty");
        assert!(truthy(&json!({})), "objects are truthy even when empty");
        assert!(truthy(&json!(-1)));
    }

    #[test]
    fn test_urlencoded_repeats_accumulate() {
        let params = parse_urlencoded(b"tag=a&tag=b&tag=c&single=x");
        assert_eq!(params.get("tag"), Some(&json!(["a", "b", "c"])));
        assert_eq!(params.get("single"), Some(&json!("x")));
    }

    #[test]
    fn test_urlencoded_keeps_bracket_keys_verbatim() {
        let params = parse_urlencoded(b"status%5B%5D=1&status%5B%5D=2");
        assert_eq!(params.get("status[]"), Some(&json!(["1", "2"])));
    }

    #[test]
    fn test_json_body_requires_an_object() {
        assert!(json_body(br#"{"a": 1}"#).contains_key("a"));
        assert!(json_body(br"[1, 2]").is_empty());
        assert!(json_body(b"not json").is_empty());
    }
}
