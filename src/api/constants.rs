//! Endpoint and header constants for the Microsoft Graph API

/// Default Graph host.
pub const GRAPH_HOST: &str = "https://graph.microsoft.com";

/// Graph API version segment.
pub const API_VERSION: &str = "v1.0";

/// JSON batch endpoint.
pub const BATCH_ENDPOINT: &str = "$batch";

/// Server-imposed cap on sub-requests per batch call.
pub const MAX_BATCH_REQUESTS: usize = 20;

/// Standard headers for Graph requests
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Required alongside `$filter` on advanced directory queries.
    pub const CONSISTENCY_LEVEL: &str = "ConsistencyLevel";
    pub const CONSISTENCY_EVENTUAL: &str = "eventual";
}

/// Build a versioned resource URL from a host and a relative path.
pub fn resource_url(host: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        host.trim_end_matches('/'),
        API_VERSION,
        path.trim_start_matches('/')
    )
}

/// `@odata.id` reference URL for a directory object, used by `$ref`
/// membership operations.
pub fn directory_object_ref(host: &str, id: &str) -> String {
    resource_url(host, &format!("directoryObjects/{}", id))
}
