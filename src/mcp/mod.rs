//! Model Context Protocol (MCP) server implementation
//!
//! This module provides an MCP server using the Streamable HTTP transport.
//! The server exposes Teamwork records as tools and as `twapi://` resources.
//!
//! # Architecture
//!
//! - **tools**: One module per resource family. Each declares its parameter
//!   structs and registers tools on the `Catalog` tool router
//! - **registry**: `twapi://` resources and resource templates, keyed by URI
//! - **server**: The `ServerHandler` answering from the catalog
//! - **service**: The Streamable HTTP service nested into the router

pub mod registry;
pub mod server;
mod service;
pub mod tools;
mod uri;

#[cfg(test)]
mod server_test;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod service_test;

pub use registry::{Registry, RegistryError};
pub use server::McpServer;
pub use service::create_mcp_service;
pub use tools::Catalog;
