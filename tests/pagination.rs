//! Pagination behavior over continuation links
//!
//! Verifies lazy traversal: full concatenation across pages, minimal
//! page fetching for bounded takes, client-side type filtering, and
//! error propagation from continuation fetches.

mod common;

use common::*;
use msgraph_dir::{Error, Filter, MembershipQueryable, ObjectType};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn take_all_concatenates_pages_in_server_order() {
    let server = MockServer::start().await;

    let page2_link = format!("{}/v1.0/users?page=2", server.uri());
    let page3_link = format!("{}/v1.0/users?page=3", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u1", "u1@contoso.com"), test_user("u2", "u2@contoso.com")],
            Some(&page2_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u3", "u3@contoso.com")],
            Some(&page3_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u4", "u4@contoso.com")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session.list_users(None).await.unwrap();
    let objects = pager.take_all().await.unwrap();

    let ids: Vec<&str> = objects.iter().filter_map(|o| o.id()).collect();
    assert_eq!(ids, vec!["u1", "u2", "u3", "u4"]);
    assert!(objects.iter().all(|o| o.object_type() == ObjectType::User));

    // The collection is drained; further batches are the empty sentinel.
    assert!(!pager.has_more());
    let sentinel = pager.next_batch().await.unwrap();
    assert!(sentinel.is_empty());
    assert!(!sentinel.has_more());
}

#[tokio::test]
async fn bounded_take_fetches_only_needed_pages() {
    let server = MockServer::start().await;

    let page2_link = format!("{}/v1.0/users?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![
                test_user("u1", "u1@contoso.com"),
                test_user("u2", "u2@contoso.com"),
                test_user("u3", "u3@contoso.com"),
            ],
            Some(&page2_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // The second page must never be requested for take(2).
    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(vec![], None)))
        .expect(0)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session.list_users(None).await.unwrap();
    let objects = pager.take(2).await.unwrap();

    assert_eq!(objects.len(), 2);
    // The third item stays buffered for a later take.
    assert!(pager.has_more());
    let rest = pager.take(1).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].id(), Some("u3"));
}

#[tokio::test]
async fn filtered_continuation_pages_keep_consistency_header() {
    let server = MockServer::start().await;

    // Graph echoes the filter back inside the continuation link, in
    // percent-encoded form.
    let page2_link = format!(
        "{}/v1.0/users?%24filter=mail%20eq%20'x'&%24count=true&page=2",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$filter", "mail eq 'x'"))
        .and(query_param_is_missing("page"))
        .and(header("ConsistencyLevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u1", "u1@contoso.com")],
            Some(&page2_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // The advanced-query header must also be on page 2, where the
    // filter only lives inside the link URL.
    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("page", "2"))
        .and(header("ConsistencyLevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u2", "u2@contoso.com")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session
        .list_users(Some(Filter::raw("mail eq 'x'")))
        .await
        .unwrap();
    let objects = pager.take_all().await.unwrap();

    let ids: Vec<&str> = objects.iter().filter_map(|o| o.id()).collect();
    assert_eq!(ids, vec!["u1", "u2"]);
}

#[tokio::test]
async fn continuation_fetch_error_aborts_with_api_error() {
    let server = MockServer::start().await;

    let page2_link = format!("{}/v1.0/users?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_user("u1", "u1@contoso.com")],
            Some(&page2_link),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": "ServiceUnavailable", "message": "try again later"}
        })))
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session.list_users(None).await.unwrap();

    // The first page is still consumable on its own.
    let first = pager.next_batch().await.unwrap();
    assert_eq!(first.len(), 1);

    match pager.next_batch().await {
        Err(Error::Api { status, code, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(code, "ServiceUnavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn type_filter_drops_items_without_changing_page_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users/u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(test_user("u1", "u1@contoso.com")),
        )
        .mount(&server)
        .await;

    let page2_link = format!("{}/v1.0/users/u1/memberOf?page=2", server.uri());

    // memberOf returns mixed types: groups plus directory roles.
    Mock::given(method("GET"))
        .and(path("/v1.0/users/u1/memberOf"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![
                test_group("g1", "Finance"),
                json!({
                    "@odata.type": "#microsoft.graph.directoryRole",
                    "id": "role1",
                    "displayName": "Global Reader"
                }),
            ],
            Some(&page2_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users/u1/memberOf"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![test_group("g2", "Ops")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let user = session.get_user(Some("u1"), None, None).await.unwrap();

    let mut pager = user.list_group_memberships(None).await.unwrap();
    let groups = pager.take(2).await.unwrap();

    // The role was dropped after dispatch; both pages were fetched to
    // satisfy the bound of 2.
    let ids: Vec<&str> = groups.iter().filter_map(|o| o.id()).collect();
    assert_eq!(ids, vec!["g1", "g2"]);
    assert!(groups.iter().all(|o| o.object_type() == ObjectType::Group));
}

#[tokio::test]
async fn raw_mode_yields_untyped_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![json!({"id": "u1"}), json!({"id": "u2"})],
            None,
        )))
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session.list_users(None).await.unwrap();
    let values = pager.take_all_values().await.unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["id"], "u1");
    assert_eq!(values[1]["id"], "u2");
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session(&server);
    let mut pager = session.list_users(None).await.unwrap();
    assert!(pager.take_all().await.unwrap().is_empty());
}
