//! In-process MCP client wired to an `McpServer` over a duplex pipe.
//!
//! Tests drive tools and resources through the real protocol path: JSON-RPC
//! framing, the tool router and the handler's error mapping.

use rmcp::ErrorData as McpError;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ClientInfo, ReadResourceRequestParams, Resource,
    ResourceContents, ResourceTemplate, Tool,
};
use rmcp::service::{RoleClient, RunningService, ServiceError};
use rmcp::{ClientHandler, ServiceExt};
use serde_json::Value;
use tokio::task::JoinHandle;

use super::server::McpServer;
use crate::twapi::Engine;
use crate::twapi::testing::within;

#[derive(Debug, Clone, Default)]
pub(crate) struct TestClient;

impl ClientHandler for TestClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

/// A connected client and the task serving its session.
pub(crate) struct McpHarness {
    client: RunningService<RoleClient, TestClient>,
    server: JoinHandle<()>,
}

impl McpHarness {
    pub(crate) async fn start(engine: Engine) -> Self {
        let server = McpServer::with_catalog(engine).expect("catalog should build");
        let (server_transport, client_transport) = tokio::io::duplex(65536);

        let server = tokio::spawn(async move {
            let service = server
                .serve(server_transport)
                .await
                .expect("server should initialize");
            let _ = service.waiting().await;
        });

        let client = within(TestClient.serve(client_transport))
            .await
            .expect("client should initialize");

        Self { client, server }
    }

    /// Call `name` with `arguments` (a JSON object, or null for none).
    pub(crate) async fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        let mut params = CallToolRequestParams::new(name.to_string());
        match arguments {
            Value::Object(map) => params = params.with_arguments(map),
            Value::Null => {}
            other => panic!("arguments must be an object, got {other}"),
        }
        protocol(within(self.client.call_tool(params)).await)
    }

    pub(crate) async fn read(&self, uri: &str) -> Result<Vec<ResourceContents>, McpError> {
        let result = within(
            self.client
                .read_resource(ReadResourceRequestParams::new(uri)),
        )
        .await;
        protocol(result).map(|read| read.contents)
    }

    pub(crate) async fn tools(&self) -> Vec<Tool> {
        within(self.client.list_all_tools())
            .await
            .expect("tools should list")
    }

    pub(crate) async fn resources(&self) -> Vec<Resource> {
        within(self.client.list_all_resources())
            .await
            .expect("resources should list")
    }

    pub(crate) async fn resource_templates(&self) -> Vec<ResourceTemplate> {
        within(self.client.list_all_resource_templates())
            .await
            .expect("templates should list")
    }
}

impl Drop for McpHarness {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Protocol errors come back as `Err`, transport failures fail the test.
fn protocol<T>(result: Result<T, ServiceError>) -> Result<T, McpError> {
    match result {
        Ok(value) => Ok(value),
        Err(ServiceError::McpError(err)) => Err(err),
        Err(other) => panic!("transport failure: {other}"),
    }
}
