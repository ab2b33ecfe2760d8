//! Tests for the MCP server handler

use rmcp::ServerHandler;
use rmcp::model::{ErrorCode, RawContent, ResourceContents};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::server::McpServer;
use super::testing::McpHarness;
use crate::twapi::testing::{MockUpstream, within};

const V3: &str = "/projects/api/v3";

#[tokio::test]
async fn test_server_info() {
    let upstream = MockUpstream::new().start().await;
    let server = McpServer::with_catalog(upstream.engine()).unwrap();

    let info = server.get_info();

    assert!(info.capabilities.tools.is_some(), "Server should support tools");
    assert!(
        info.capabilities.resources.is_some(),
        "Server should support resources"
    );
    assert!(
        info.instructions.is_some(),
        "Server should provide instructions"
    );
}

#[tokio::test]
async fn test_clones_share_catalog() {
    let upstream = MockUpstream::new().start().await;
    let server = McpServer::with_catalog(upstream.engine()).unwrap();
    let clone = server.clone();

    assert!(std::ptr::eq(server.catalog(), clone.catalog()));
    assert!(clone.catalog().tools().has_route("retrieve-tasks"));
}

#[tokio::test]
async fn test_unknown_tool_rejected() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness.call("frobnicate", json!({})).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(err.message, "tool not found");
    assert_eq!(err.data, Some(json!({"tool": "frobnicate"})));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_call_runs_tool() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/projects/12.json"),
            200,
            json!({"project": {"id": 12, "name": "Apollo"}}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call("retrieve-project", json!({"project-id": 12}))
        .await
        .unwrap();

    let text = match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    };
    let project: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(project["name"], "Apollo");
}

#[tokio::test]
async fn test_call_without_arguments_binds_empty_map() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call("retrieve-project", serde_json::Value::Null)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(
        err.message,
        "invalid parameters: field \"project-id\": is required"
    );
}

#[tokio::test]
async fn test_cancelled_read_sends_nothing_back() {
    let path = format!("{V3}/projects/12.json");
    let upstream = MockUpstream::new()
        .on("GET", &path, 200, json!({"project": {"id": 12}}))
        .with_delay("GET", &path, std::time::Duration::from_secs(2))
        .start()
        .await;
    let server = McpServer::with_catalog(upstream.engine()).unwrap();
    let ct = CancellationToken::new();
    let trigger = ct.clone();

    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        trigger.cancel();
    });
    let err = within(server.read("twapi://projects/12", ct))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("cancelled"));
}

#[tokio::test]
async fn test_read_unknown_resource() {
    let upstream = MockUpstream::new().start().await;
    let server = McpServer::with_catalog(upstream.engine()).unwrap();

    let err = server
        .read("twapi://nothing", CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    assert_eq!(err.data, Some(json!({"uri": "twapi://nothing"})));
}

#[tokio::test]
async fn test_read_industries_resource() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/industries.json"),
            200,
            json!({"industries": [{"id": 3, "name": "Retail"}]}),
        )
        .start()
        .await;
    let server = McpServer::with_catalog(upstream.engine()).unwrap();

    let contents = within(server.read("twapi://industries", CancellationToken::new()))
        .await
        .unwrap();

    assert_eq!(contents.len(), 1);
    match &contents[0] {
        ResourceContents::TextResourceContents { uri, .. } => {
            assert_eq!(uri, "twapi://industries/3")
        }
        other => panic!("expected text resource, got {other:?}"),
    }
}
