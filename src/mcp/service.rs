//! MCP Streamable HTTP service creation
//!
//! This module provides the function creating the MCP service that is
//! nested into the Axum router.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::twapi::Engine;

use super::registry::RegistryError;
use super::server::McpServer;
use super::tools;

/// Create the MCP Streamable HTTP service.
///
/// The tool and resource catalog is built once here and shared by every
/// session. Fails only when the catalog itself is inconsistent.
///
/// `allowed_hosts` lists the `Host` header values the service answers.
/// When empty, only loopback hosts are accepted.
///
/// # Example
/// ```no_run
/// use axum::Router;
/// use tokio_util::sync::CancellationToken;
/// # use teamwork_mcp::mcp::create_mcp_service;
/// # use teamwork_mcp::twapi::Engine;
/// # fn example(engine: Engine) -> miette::Result<()> {
///
/// let ct = CancellationToken::new();
/// let mcp_service = create_mcp_service(engine, ct, &[])?;
///
/// let app: Router = Router::new().nest_service("/mcp", mcp_service);
/// # Ok(())
/// # }
/// ```
pub fn create_mcp_service(
    engine: Engine,
    cancellation_token: CancellationToken,
    allowed_hosts: &[String],
) -> Result<StreamableHttpService<McpServer, LocalSessionManager>, RegistryError> {
    let catalog = Arc::new(tools::catalog()?);

    // Service factory: creates a new McpServer per session
    // Note: Returns io::Error to match rmcp's expected signature
    let service_factory = move || -> Result<McpServer, std::io::Error> {
        Ok(McpServer::new(engine.clone(), Arc::clone(&catalog)))
    };

    let mut config = StreamableHttpServerConfig::default()
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);
    if !allowed_hosts.is_empty() {
        config = config.with_allowed_hosts(allowed_hosts.iter().cloned());
    }

    Ok(StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    ))
}
