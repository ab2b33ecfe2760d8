//! MCP server implementation
//!
//! [`McpServer`] answers the MCP tool and resource requests from the shared
//! [`Catalog`]. One instance is created per session; clones share the
//! catalog and the upstream [`Engine`].

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Implementation, ListResourceTemplatesResult,
        ListResourcesResult, ListToolsResult, PaginatedRequestParams, ReadResourceRequestParams,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    handler::server::tool::ToolCallContext,
    service::RequestContext,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

use super::registry::RegistryError;
use super::tools::{self, Catalog};
use crate::twapi::Engine;

const INSTRUCTIONS: &str = "Teamwork MCP Server - Read and manage Teamwork projects, \
tasklists, tasks, milestones, comments, timelogs, timers, companies, users, teams, tags, \
skills and job roles. Records are also readable as twapi:// resources.";

/// MCP server over a Teamwork site.
#[derive(Clone)]
pub struct McpServer {
    engine: Engine,
    catalog: Arc<Catalog>,
}

impl McpServer {
    pub fn new(engine: Engine, catalog: Arc<Catalog>) -> Self {
        Self { engine, catalog }
    }

    /// Server with every Teamwork tool and resource registered.
    pub fn with_catalog(engine: Engine) -> Result<Self, RegistryError> {
        Ok(Self::new(engine, Arc::new(tools::catalog()?)))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read a `twapi://` resource or templated URI.
    pub async fn read(
        &self,
        uri: &str,
        ct: CancellationToken,
    ) -> Result<Vec<ResourceContents>, McpError> {
        let span = info_span!("mcp.resource", uri = %uri);
        let Some(read) = self.catalog.resources().read(uri, self.engine.clone(), ct) else {
            return Err(McpError::resource_not_found(
                "resource not found",
                Some(json!({"uri": uri})),
            ));
        };
        read.instrument(span).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.catalog.tools().list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.clone();
        if !self.catalog.tools().has_route(&name) {
            warn!(tool = %name, "unknown tool");
            return Err(McpError::invalid_params(
                "tool not found",
                Some(json!({"tool": name})),
            ));
        }

        let span = info_span!("mcp.tool", tool = %name);
        async move {
            let result = self
                .catalog
                .tools()
                .call(ToolCallContext::new(self, request, context))
                .await;
            match &result {
                Ok(_) => debug!("tool succeeded"),
                Err(err) => debug!(code = err.code.0, message = %err.message, "tool failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(
            self.catalog.resources().resources(),
        ))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            self.catalog.resources().resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let contents = self.read(&request.uri, context.ct).await?;
        Ok(ReadResourceResult::new(contents))
    }
}
