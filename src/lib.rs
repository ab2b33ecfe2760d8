//! MCP server over the Teamwork project-management API.
//!
//! - [`twapi`]: the engine executing typed entities against the REST API
//! - [`params`]: binding of loosely-typed tool arguments onto those entities
//! - [`mcp`]: the tool and `twapi://` resource catalog served over MCP
//! - [`api`]: the HTTP listener hosting the MCP endpoint

pub mod api;
pub mod config;
pub mod mcp;
pub mod params;
pub mod serde_utils;
pub mod twapi;

#[cfg(test)]
mod config_test;
