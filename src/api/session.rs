//! The session: single point of outbound HTTP traffic
//!
//! Everything else in the crate issues its requests through
//! [`Session::call`]; the token itself is owned and refreshed by the
//! [`TokenCredential`] the session was built from.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::batch::{correlate, BatchRequest, BatchResponseItem};
use super::constants::{self, headers, BATCH_ENDPOINT, GRAPH_HOST, MAX_BATCH_REQUESTS};
use crate::auth::TokenCredential;
use crate::error::{Error, Result};

struct SessionInner {
    credential: TokenCredential,
    tenant: String,
    host: String,
    http_client: reqwest::Client,
}

/// Authenticated Graph API session with connection pooling. Cheap to
/// clone; every entity wrapper holds a clone back to the session it was
/// constructed from.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(credential: TokenCredential) -> Self {
        Self::with_host(credential, GRAPH_HOST)
    }

    /// Point the session at a non-default host (sovereign clouds, test
    /// servers).
    pub fn with_host(credential: TokenCredential, host: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("msgraph-dir/0.1")
            .build()
            .expect("Failed to build HTTP client");

        let tenant = credential.tenant().to_string();

        Self {
            inner: Arc::new(SessionInner {
                credential,
                tenant,
                host: host.into(),
                http_client,
            }),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.inner.tenant
    }

    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// Issue one request against the Graph API.
    ///
    /// `path` is either a path relative to the versioned API root
    /// (`users/{id}`) or an absolute URL (continuation links are used
    /// as-is). When a `$filter` query parameter is present the session
    /// adds the `ConsistencyLevel: eventual` header and `$count=true`,
    /// which Graph requires for advanced directory queries.
    ///
    /// Non-2xx responses become [`Error::Api`] carrying the status and
    /// the server's OData error body. Empty 2xx bodies map to JSON null.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
        query: &[(String, String)],
        extra_headers: &[(String, String)],
    ) -> Result<Value> {
        let url = if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            constants::resource_url(&self.inner.host, path)
        };

        let token = self.inner.credential.bearer().await?;

        debug!("{} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method, &url)
            .bearer_auth(&token)
            .header("Accept", headers::CONTENT_TYPE_JSON);

        // Continuation links carry their $filter inside the URL itself,
        // and Graph requires the consistency header on every page of an
        // advanced query, not just the first.
        let filtered = query.iter().any(|(k, _)| k == "$filter") || has_odata_param(&url, "filter");
        if !query.is_empty() {
            request = request.query(query);
        }
        if filtered {
            request = request.header(headers::CONSISTENCY_LEVEL, headers::CONSISTENCY_EVENTUAL);
            if !query.iter().any(|(k, _)| k == "$count") && !has_odata_param(&url, "count") {
                request = request.query(&[("$count", "true")]);
            }
        }

        for (name, value) in extra_headers {
            request = request.header(name, value);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        debug!("Response status: {}", status);

        if status.is_success() {
            let text = response.text().await?;
            if text.is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_str(&text)?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(Error::from_response(status.as_u16(), &error_text))
        }
    }

    /// Execute up to [`MAX_BATCH_REQUESTS`] sub-requests in one `$batch`
    /// call. Responses come back re-associated to the supplied requests
    /// by their `id` field (the server does not guarantee order), in the
    /// caller's request order.
    pub async fn call_batch(
        &self,
        requests: &[BatchRequest],
    ) -> Result<Vec<BatchResponseItem>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        if requests.len() > MAX_BATCH_REQUESTS {
            return Err(Error::InvalidArguments(format!(
                "batch accepts at most {} sub-requests, got {}",
                MAX_BATCH_REQUESTS,
                requests.len()
            )));
        }

        debug!("Dispatching batch of {} sub-requests", requests.len());

        let body = serde_json::json!({ "requests": requests });
        let json = self
            .call(BATCH_ENDPOINT, Method::POST, Some(body), &[], &[])
            .await?;

        let responses = json
            .get("responses")
            .cloned()
            .ok_or_else(|| Error::Payload("missing 'responses' array in batch reply".to_string()))?;
        let items: Vec<BatchResponseItem> = serde_json::from_value(responses)?;

        correlate(requests, items)
    }
}

/// Whether a URL's query string already carries the given OData system
/// parameter, in either its literal (`$name=`) or percent-encoded
/// (`%24name=`) spelling.
fn has_odata_param(url: &str, name: &str) -> bool {
    let Some((_, query)) = url.split_once('?') else {
        return false;
    };
    let literal = format!("${}", name);
    let encoded = format!("%24{}", name);
    query.split('&').any(|pair| {
        let key = pair.split('=').next().unwrap_or(pair);
        key == literal || key.eq_ignore_ascii_case(&encoded)
    })
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tenant", &self.inner.tenant)
            .field("host", &self.inner.host)
            .finish_non_exhaustive()
    }
}
