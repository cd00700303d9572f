//! Integration tests for the event and attribute endpoints.

mod common;

use axum::http::{HeaderValue, StatusCode};
use common::*;
use hermes_rest::ServerConfig;
use serde_json::{Value, json};

fn ids(body: &Value) -> Vec<String> {
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Event Listing
// =============================================================================

#[tokio::test]
async fn test_list_events_default_order() {
    let server = fixture_server();
    let response = server.get("/v1/events").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], json!(4));
    assert_eq!(ids(&body), vec!["e2", "e3", "e1", "e4"]);
}

#[tokio::test]
async fn test_list_events_outcome_and_limit() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("outcome", "success")
        .add_query_param("limit", "2")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["e3", "e1"]);
    assert!(
        body["events"]
            .as_array()
            .unwrap()
            .iter()
            .all(|e| e["outcome"] == "success")
    );
}

#[tokio::test]
async fn test_list_events_negation() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("target_type", "!service/security/account/user")
        .await;

    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["e3", "e1"]);
}

#[tokio::test]
async fn test_list_events_time_range_and_sort() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("time", "gte:2017-11-06T10:00:00Z,lt:2017-11-06T10:17:00Z")
        .add_query_param("sort", "time:asc")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["e1", "e3"]);
}

#[tokio::test]
async fn test_list_events_pagination() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("offset", "1")
        .add_query_param("limit", "2")
        .await;

    let body: Value = response.json();
    assert_eq!(body["total"], json!(4));
    assert_eq!(ids(&body), vec!["e3", "e1"]);
}

#[tokio::test]
async fn test_limit_above_backend_maximum_rejected() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("limit", "101")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid");
}

#[tokio::test]
async fn test_malformed_time_rejected() {
    let server = fixture_server();
    let response = server
        .get("/v1/events")
        .add_query_param("time", "after:2017-11-06T10:00:00Z")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/v1/events")
        .add_query_param("sort", "time:sideways")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Event Lookup
// =============================================================================

#[tokio::test]
async fn test_get_event() {
    let server = fixture_server();
    let response = server.get("/v1/events/e3").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "e3");
    assert_eq!(body["target"]["typeURI"], "data/security/role/assignment");
}

#[tokio::test]
async fn test_get_missing_event_is_404() {
    let server = fixture_server();
    let response = server.get("/v1/events/nope").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not-found");
}

// =============================================================================
// Attributes
// =============================================================================

#[tokio::test]
async fn test_attribute_values_truncated_and_sorted() {
    let server = fixture_server();
    let response = server
        .get("/v1/attributes/target_type")
        .add_query_param("max_depth", "2")
        .await;

    response.assert_status_ok();
    let values: Vec<String> = response.json();
    assert_eq!(values, vec!["data/security", "service/security"]);
}

#[tokio::test]
async fn test_attribute_values_untruncated() {
    let server = fixture_server();
    let values: Vec<String> = server.get("/v1/attributes/outcome").await.json();
    assert_eq!(values, vec!["failure", "success"]);
}

// =============================================================================
// Backend Failures
// =============================================================================

#[tokio::test]
async fn test_backend_reported_error_is_502_with_details() {
    let server = server_with(StubStorage(StubBehavior::Rejects), ServerConfig::for_testing());
    let response = server.get("/v1/events").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "backend-error");
    assert_eq!(
        body["error"]["details"]["type"],
        "search_phase_execution_exception"
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_503() {
    let server = server_with(
        StubStorage(StubBehavior::Unreachable),
        ServerConfig::for_testing(),
    );
    let response = server.get("/v1/attributes/action").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_query_deadline_is_504() {
    let config = ServerConfig {
        query_timeout: 1,
        ..ServerConfig::for_testing()
    };
    let server = server_with(StubStorage(StubBehavior::Hangs), config);
    let response = server.get("/v1/events/e1").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "timeout");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = fixture_server();
    let response = server
        .get("/health")
        .add_header(X_TENANT_ID, HeaderValue::from_static("ignored"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}
