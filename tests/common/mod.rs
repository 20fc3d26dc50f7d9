//! Shared helpers for integration tests

#![allow(dead_code)]

use msgraph_dir::{Session, TokenCredential};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Session with a fixed bearer token, pointed at the mock server.
pub fn test_session(server: &MockServer) -> Session {
    let _ = env_logger::builder().is_test(true).try_init();
    Session::with_host(TokenCredential::from_static("test-token"), server.uri())
}

/// Build an OData list payload with an optional continuation link.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut body = json!({ "value": items });
    if let Some(link) = next_link {
        body["@odata.nextLink"] = json!(link);
    }
    body
}

pub fn test_user(id: &str, upn: &str) -> Value {
    json!({
        "id": id,
        "displayName": format!("User {}", id),
        "userPrincipalName": upn,
        "mail": upn,
    })
}

pub fn test_group(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "mailEnabled": false,
        "securityEnabled": true,
    })
}

pub fn test_application(id: &str, app_id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "appId": app_id,
        "displayName": name,
        "signInAudience": "AzureADMyOrg",
    })
}

pub fn test_service_principal(id: &str, app_id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "appId": app_id,
        "displayName": name,
        "servicePrincipalType": "Application",
    })
}
