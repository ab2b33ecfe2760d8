//! Resources and resource templates, keyed by URI.
//!
//! Each resource family registers its readers once at startup. The registry
//! is immutable afterwards and shared by every MCP session; readers are
//! plain functions over the [`Engine`] handle, so they may run concurrently.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use miette::Diagnostic;
use rmcp::ErrorData as McpError;
use rmcp::model::{
    AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceContents, ResourceTemplate,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::uri::UriTemplate;
use crate::twapi::Engine;

/// Resource bodies are JSON documents.
pub const MIME_JSON: &str = "application/json";

#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("invalid resource template {template}: {reason}")]
    #[diagnostic(code(teamwork_mcp::mcp::invalid_template))]
    InvalidTemplate { template: String, reason: String },

    #[error("tool {0} is registered twice")]
    #[diagnostic(code(teamwork_mcp::mcp::duplicate_tool))]
    DuplicateTool(String),

    #[error("resource {0} is registered twice")]
    #[diagnostic(code(teamwork_mcp::mcp::duplicate_resource))]
    DuplicateResource(String),

    #[error("input schema of tool {tool}: {reason}")]
    #[diagnostic(code(teamwork_mcp::mcp::input_schema))]
    InputSchema { tool: String, reason: String },
}

pub type ReadFuture = BoxFuture<'static, Result<Vec<ResourceContents>, McpError>>;

type ListHandler = Arc<dyn Fn(Engine, CancellationToken) -> ReadFuture + Send + Sync>;
type ItemHandler = Arc<dyn Fn(Engine, i64, CancellationToken) -> ReadFuture + Send + Sync>;

struct ListEntry {
    resource: Resource,
    handler: ListHandler,
}

struct TemplateEntry {
    template: UriTemplate,
    descriptor: ResourceTemplate,
    handler: ItemHandler,
}

#[derive(Default)]
pub struct Registry {
    lists: HashMap<String, ListEntry>,
    list_order: Vec<String>,
    templates: Vec<TemplateEntry>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("resources", &self.list_order)
            .field(
                "templates",
                &self
                    .templates
                    .iter()
                    .map(|t| t.template.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed resource URI, typically the list of a family.
    pub fn resource<F, Fut>(
        &mut self,
        uri: &'static str,
        name: &'static str,
        description: &'static str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Engine, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<ResourceContents>, McpError>> + Send + 'static,
    {
        if self.lists.contains_key(uri) {
            return Err(RegistryError::DuplicateResource(uri.to_string()));
        }
        let resource = RawResource::new(uri, name)
            .with_description(description)
            .with_mime_type(MIME_JSON)
            .no_annotation();
        let handler: ListHandler = Arc::new(
            move |engine: Engine, ct: CancellationToken| -> ReadFuture {
                Box::pin(handler(engine, ct))
            },
        );
        self.lists
            .insert(uri.to_string(), ListEntry { resource, handler });
        self.list_order.push(uri.to_string());
        Ok(())
    }

    /// Register a template with one numeric `{id}` placeholder.
    pub fn template<F, Fut>(
        &mut self,
        template: &'static str,
        name: &'static str,
        description: &'static str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Engine, i64, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<ResourceContents>, McpError>> + Send + 'static,
    {
        if self.templates.iter().any(|t| t.template.as_str() == template) {
            return Err(RegistryError::DuplicateResource(template.to_string()));
        }
        let compiled = UriTemplate::compile(template)?;
        if compiled.capture(&compiled.expand("id", 1), "id") != Some(1) {
            return Err(RegistryError::InvalidTemplate {
                template: template.to_string(),
                reason: "missing {id} placeholder".to_string(),
            });
        }
        let described = RawResourceTemplate::new(template, name)
            .with_description(description)
            .with_mime_type(MIME_JSON)
            .no_annotation();
        let handler: ItemHandler = Arc::new(
            move |engine: Engine, id: i64, ct: CancellationToken| -> ReadFuture {
                Box::pin(handler(engine, id, ct))
            },
        );
        self.templates.push(TemplateEntry {
            template: compiled,
            descriptor: described,
            handler,
        });
        Ok(())
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.list_order
            .iter()
            .filter_map(|uri| self.lists.get(uri))
            .map(|entry| entry.resource.clone())
            .collect()
    }

    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// Start reading `uri`: exact resource URIs first, then templates in
    /// registration order.
    pub fn read(&self, uri: &str, engine: Engine, ct: CancellationToken) -> Option<ReadFuture> {
        if let Some(entry) = self.lists.get(uri) {
            return Some((entry.handler)(engine, ct));
        }
        self.templates.iter().find_map(|entry| {
            let id = entry.template.capture(uri, "id")?;
            Some((entry.handler)(engine.clone(), id, ct.clone()))
        })
    }
}
