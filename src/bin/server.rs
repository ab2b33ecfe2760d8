//! Teamwork MCP server binary.
//!
//! Reads the configuration, builds the shared upstream engine and serves
//! the MCP endpoint until Ctrl-C.

use miette::IntoDiagnostic;
use reqwest::Client;
use teamwork_mcp::api;
use teamwork_mcp::config::{Config, ConfigError};
use teamwork_mcp::twapi::Engine;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        // --help and --version land here too
        Err(ConfigError::Arguments(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };

    api::init_tracing(config.log_level);

    // reqwest is built without a default crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    if let Some(name) = &config.agentic_name {
        info!(agentic = %name, "agentic backend configured; not embedded in this server");
    }
    info!(?config, "starting");

    let client = Client::builder().build().into_diagnostic()?;
    let engine = Engine::with_client(config.server.clone(), config.token.clone(), client);

    api::run(&config, engine, CancellationToken::new()).await?;
    Ok(())
}
