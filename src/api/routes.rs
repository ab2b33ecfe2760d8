//! API route configuration.

use axum::Router;
use axum::routing::get;
use tokio_util::sync::CancellationToken;

use super::handlers;
use crate::mcp::{RegistryError, create_mcp_service};
use crate::twapi::Engine;

/// Create the router: `GET /health` and the MCP service under `/mcp`.
pub fn create_router(
    engine: Engine,
    ct: CancellationToken,
    allowed_hosts: &[String],
) -> Result<Router, RegistryError> {
    let mcp_service = create_mcp_service(engine, ct, allowed_hosts)?;

    Ok(Router::new()
        .route("/health", get(handlers::health))
        .nest_service("/mcp", mcp_service))
}
