// ABOUTME: Tests for RemoteInvoker against a local mock HTTP server -
// ABOUTME: placement, headers, error kinds, and workflow polling.

use std::time::{Duration, Instant};

use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::error::InvocationError;

#[tokio::test]
async fn test_get_places_args_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/quote"))
        .and(query_param("category", "wisdom"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "quote": "Know thyself",
            "author": "Socrates"
        })))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::get(format!("{}/api/quote", server.uri()));
    let result = invoker
        .invoke(&descriptor, &serde_json::json!({ "category": "wisdom" }))
        .await
        .unwrap();

    assert_eq!(result["quote"], "Know thyself");
}

#[tokio::test]
async fn test_post_places_args_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "action": "process" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::post(format!("{}/trigger", server.uri()));
    let result = invoker
        .invoke(&descriptor, &serde_json::json!({ "action": "process" }))
        .await
        .unwrap();

    assert_eq!(result, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn test_bearer_credential_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("authorization", "Bearer seekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new().bearer("seekrit");
    let descriptor = RemoteDescriptor::get(format!("{}/secure", server.uri()));
    assert!(invoker
        .invoke(&descriptor, &serde_json::json!({}))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_empty_body_returns_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accepted"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::post(format!("{}/accepted", server.uri()));
    let result = invoker
        .invoke(&descriptor, &serde_json::json!({}))
        .await
        .unwrap();

    assert!(result.is_null());
}

#[tokio::test]
async fn test_error_status_carries_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(502).set_body_string("y".repeat(600)))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::get(format!("{}/broken", server.uri()));
    let err = invoker
        .invoke(&descriptor, &serde_json::json!({}))
        .await
        .unwrap_err();

    assert!(!err.is_transport());
    match err {
        InvocationError::Status { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body.len(), 500);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_transport_kind() {
    let invoker = RemoteInvoker::with_timeout(Duration::from_millis(500));
    // Nothing listens on this port.
    let descriptor = RemoteDescriptor::get("http://127.0.0.1:1/unreachable");
    let err = invoker
        .invoke(&descriptor, &serde_json::json!({}))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn test_invoke_and_await_polls_to_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflow_run_id": "wf-1",
            "status": "pending"
        })))
        .mount(&server)
        .await;
    // First two status polls report running, then terminal success.
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("correlation_id", "wf-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflow_run_id": "wf-1",
            "status": "running"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflow_run_id": "wf-1",
            "status": "succeeded",
            "output": {"result": 7}
        })))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::post(format!("{}/trigger", server.uri()))
        .status_url(format!("{}/status", server.uri()));

    let start = Instant::now();
    let response = invoker
        .invoke_and_await(
            &descriptor,
            &serde_json::json!({ "action": "go" }),
            Duration::from_millis(50),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(response.is_successful());
    assert_eq!(response.output["result"], 7);
    // Three polls at 50ms apart.
    assert!(
        start.elapsed() >= Duration::from_millis(150),
        "expected at least three poll intervals, got {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_invoke_and_await_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflow_run_id": "wf-stuck",
            "status": "pending"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflow_run_id": "wf-stuck",
            "status": "running"
        })))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    // No status_url: polling falls back to the trigger endpoint.
    let descriptor = RemoteDescriptor::post(format!("{}/trigger", server.uri()));

    let err = invoker
        .invoke_and_await(
            &descriptor,
            &serde_json::json!({}),
            Duration::from_millis(30),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();

    match err {
        InvocationError::Timeout {
            correlation_id,
            waited,
        } => {
            assert_eq!(correlation_id, "wf-stuck");
            assert!(waited >= Duration::from_millis(200));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let invoker = RemoteInvoker::new();
    let descriptor = RemoteDescriptor::get(format!("{}/html", server.uri()));
    let err = invoker
        .invoke(&descriptor, &serde_json::json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, InvocationError::Deserialize { .. }));
}
