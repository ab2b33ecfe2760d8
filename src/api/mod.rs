//! HTTP surface: the MCP endpoint and a health check behind one listener.

mod handlers;
mod routes;


use std::net::{Ipv4Addr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogLevel};
use crate::mcp::RegistryError;
use crate::twapi::Engine;

pub use handlers::HealthResponse;
pub use routes::create_router;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("cannot build the MCP catalog")]
    #[diagnostic(code(teamwork_mcp::api::catalog))]
    Catalog(#[from] RegistryError),

    #[error("cannot listen on {addr}")]
    #[diagnostic(code(teamwork_mcp::api::bind))]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed")]
    #[diagnostic(code(teamwork_mcp::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Initialize tracing subscriber with env filter.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// the HTTP trace layer.
pub fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.directives().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Serve until Ctrl-C or until `ct` is cancelled. Open MCP sessions are
/// cancelled through the same token.
pub async fn run(config: &Config, engine: Engine, ct: CancellationToken) -> Result<(), ApiError> {
    let app = create_router(engine, ct.clone(), &config.allowed_hosts)?
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    let local = listener.local_addr().unwrap_or(addr);
    info!(server = %config.server, "MCP server listening on http://{}/mcp", local);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(ct))
        .await
        .map_err(ApiError::Serve)?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal(ct: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("received Ctrl-C, shutting down"),
            Err(err) => {
                warn!(error = %err, "cannot listen for Ctrl-C");
                ct.cancelled().await;
            }
        },
        _ = ct.cancelled() => {}
    }
    ct.cancel();
}
