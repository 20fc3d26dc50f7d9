//! JSON batch requests for the Graph `$batch` endpoint
//!
//! Sub-request and sub-response types plus the id-based correlation the
//! batch endpoint requires: the server may return responses in any
//! order, so position is never trusted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};

/// One sub-request inside a `$batch` call.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRequest {
    pub id: String,
    pub method: String,
    /// Path relative to the versioned API root, with a leading slash.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl BatchRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), method, url)
    }

    /// Use a caller-supplied correlation id instead of a generated one.
    pub fn with_id(
        id: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let url = if url.starts_with('/') {
            url
        } else {
            format!("/{}", url)
        };
        Self {
            id: id.into(),
            method: method.into(),
            url,
            body: None,
            headers: None,
        }
    }

    /// Attach a JSON body; the batch endpoint requires an explicit
    /// Content-Type on bodied sub-requests.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        let headers = self.headers.get_or_insert_with(HashMap::new);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        self
    }
}

/// One sub-response from a `$batch` call.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponseItem {
    pub id: String,
    pub status: u16,
    #[serde(default)]
    pub body: Option<Value>,
}

impl BatchResponseItem {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Re-associate responses to requests by id and return them in request
/// order. A request id with no matching response is a payload error.
pub(crate) fn correlate(
    requests: &[BatchRequest],
    responses: Vec<BatchResponseItem>,
) -> Result<Vec<BatchResponseItem>> {
    let mut by_id: HashMap<String, BatchResponseItem> = responses
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    let mut ordered = Vec::with_capacity(requests.len());
    for request in requests {
        let item = by_id.remove(&request.id).ok_or_else(|| {
            Error::Payload(format!(
                "batch reply is missing a response for request id '{}'",
                request.id
            ))
        })?;
        ordered.push(item);
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_shape() {
        let request = BatchRequest::with_id("1", "POST", "users").body(json!({"displayName": "x"}));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["url"], "/users");
        assert_eq!(value["body"]["displayName"], "x");
        assert_eq!(value["headers"]["Content-Type"], "application/json");
    }

    #[test]
    fn test_bodyless_request_omits_optional_fields() {
        let request = BatchRequest::with_id("1", "GET", "/users/abc");
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("body").is_none());
        assert!(value.get("headers").is_none());
    }

    #[test]
    fn test_correlation_ignores_positional_order() {
        let requests = vec![
            BatchRequest::with_id("a", "GET", "/users/1"),
            BatchRequest::with_id("b", "GET", "/users/2"),
            BatchRequest::with_id("c", "GET", "/users/3"),
        ];
        // Server returns responses permuted.
        let responses = vec![
            BatchResponseItem {
                id: "c".to_string(),
                status: 200,
                body: Some(json!({"id": "3"})),
            },
            BatchResponseItem {
                id: "a".to_string(),
                status: 404,
                body: None,
            },
            BatchResponseItem {
                id: "b".to_string(),
                status: 200,
                body: Some(json!({"id": "2"})),
            },
        ];

        let ordered = correlate(&requests, responses).unwrap();
        assert_eq!(ordered[0].id, "a");
        assert_eq!(ordered[0].status, 404);
        assert_eq!(ordered[1].id, "b");
        assert_eq!(ordered[2].id, "c");
        assert_eq!(ordered[2].body.as_ref().unwrap()["id"], "3");
    }

    #[test]
    fn test_correlation_missing_response() {
        let requests = vec![
            BatchRequest::with_id("a", "GET", "/users/1"),
            BatchRequest::with_id("b", "GET", "/users/2"),
        ];
        let responses = vec![BatchResponseItem {
            id: "a".to_string(),
            status: 200,
            body: None,
        }];

        assert!(matches!(
            correlate(&requests, responses),
            Err(Error::Payload(_))
        ));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = BatchRequest::new("GET", "/users/1");
        let b = BatchRequest::new("GET", "/users/2");
        assert_ne!(a.id, b.id);
    }
}
