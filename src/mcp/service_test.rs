//! Tests for MCP Streamable HTTP service integration

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{ACCEPT, CONTENT_TYPE, HOST},
    },
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::twapi::testing::MockUpstream;

async fn router(allowed_hosts: &[String]) -> Router {
    let upstream = MockUpstream::new().start().await;
    let service =
        super::create_mcp_service(upstream.engine(), CancellationToken::new(), allowed_hosts)
            .expect("catalog should build");
    Router::new().nest_service("/mcp", service)
}

fn initialize(host: &str) -> Request<Body> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "0.0.0"}
        }
    });

    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(HOST, host)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json, text/event-stream")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_mcp_service_with_router() {
    let app = router(&[]).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(HOST, "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Root path should return 404 (only /mcp is mounted)
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mcp_endpoint_is_mounted() {
    let app = router(&[]).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/mcp")
                .header(HOST, "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // rmcp answers protocol errors itself; anything but 404 means it is mounted
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_initialize_opens_session() {
    let app = router(&[]).await;

    let response = app.oneshot(initialize("localhost")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("mcp-session-id"),
        "stateful mode should assign a session"
    );
}

#[tokio::test]
async fn test_foreign_host_rejected_by_default() {
    let app = router(&[]).await;

    let response = app.oneshot(initialize("mcp.example.com")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_configured_host_accepted() {
    let hosts = vec!["mcp.example.com".to_string()];

    let accepted = router(&hosts)
        .await
        .oneshot(initialize("mcp.example.com"))
        .await
        .unwrap();
    let rejected = router(&hosts)
        .await
        .oneshot(initialize("localhost"))
        .await
        .unwrap();

    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
}
