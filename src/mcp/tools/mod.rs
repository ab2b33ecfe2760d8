//! Tool and resource registration, one module per resource family.
//!
//! Every handler follows the same path: bind arguments into an entity,
//! apply checks the binders cannot express, execute, serialize.

mod activities;
mod comments;
mod companies;
mod industries;
mod jobroles;
mod milestones;
mod projects;
mod skills;
mod tags;
mod tasklists;
mod tasks;
mod teams;
mod timelogs;
mod timers;
mod users;

#[cfg(test)]
mod tools_test;

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures_util::future::BoxFuture;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::common::schema_for_input;
use rmcp::handler::server::router::tool::{ToolRoute, ToolRouter};
use rmcp::model::{CallToolResult, Content, ResourceContents, Tool};
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{Span, debug_span, info};

use super::registry::{Registry, RegistryError};
use super::server::McpServer;
use crate::params::{
    Arguments, BindError, Binder, bind_group, optional_numeric_list_param,
    optional_numeric_pointer_param, optional_pointer_param, required_numeric_param,
};
use crate::twapi::{
    Engine, Entity, Error, ListResponse, Pagination, SearchFilters, SingleResponse, UserGroups,
    with_id_callback, with_span,
};

/// Every tool and resource this server exposes.
pub fn catalog() -> Result<Catalog, RegistryError> {
    let mut catalog = Catalog::new();
    projects::register(&mut catalog)?;
    tasklists::register(&mut catalog)?;
    tasks::register(&mut catalog)?;
    milestones::register(&mut catalog)?;
    comments::register(&mut catalog)?;
    timelogs::register(&mut catalog)?;
    timers::register(&mut catalog)?;
    companies::register(&mut catalog)?;
    users::register(&mut catalog)?;
    teams::register(&mut catalog)?;
    tags::register(&mut catalog)?;
    skills::register(&mut catalog)?;
    jobroles::register(&mut catalog)?;
    industries::register(&mut catalog)?;
    activities::register(&mut catalog)?;
    Ok(catalog)
}

// =============================================================================
// Catalog
// =============================================================================

pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, McpError>>;

/// A tool body. It receives its own clone of the engine, the raw argument
/// object and the caller's cancellation token.
pub trait ToolHandler: Send + Sync + 'static {
    fn call(&self, engine: Engine, arguments: Arguments, ct: CancellationToken) -> ToolFuture;
}

impl<F, Fut> ToolHandler for F
where
    F: Fn(Engine, Arguments, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult, McpError>> + Send + 'static,
{
    fn call(&self, engine: Engine, arguments: Arguments, ct: CancellationToken) -> ToolFuture {
        Box::pin(self(engine, arguments, ct))
    }
}

/// Tools routed by name plus the `twapi://` resources. Built once at startup
/// and shared by every session.
#[derive(Debug, Default)]
pub struct Catalog {
    tools: ToolRouter<McpServer>,
    resources: Registry,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tools(&self) -> &ToolRouter<McpServer> {
        &self.tools
    }

    pub fn resources(&self) -> &Registry {
        &self.resources
    }

    /// Register a tool advertising the input schema of `P`.
    ///
    /// `P` only describes the arguments. The handler binds the raw object
    /// itself so that every invalid field is reported in one error.
    pub fn tool<P: JsonSchema + 'static>(
        &mut self,
        name: &'static str,
        description: &'static str,
        handler: impl ToolHandler,
    ) -> Result<(), RegistryError> {
        if self.tools.has_route(name) {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }
        let schema = schema_for_input::<P>().map_err(|reason| RegistryError::InputSchema {
            tool: name.to_string(),
            reason,
        })?;
        self.tools.add_route(ToolRoute::new_dyn(
            Tool::new(name, description, schema),
            move |context: rmcp::handler::server::tool::ToolCallContext<'_, McpServer>| {
                let engine = context.service.engine().clone();
                let arguments = context.arguments.unwrap_or_default();
                handler.call(engine, arguments, context.request_context.ct)
            },
        ));
        Ok(())
    }

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
        self.resources.resource(uri, name, description, handler)
    }

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
        self.resources.template(template, name, description, handler)
    }
}

// =============================================================================
// Errors
// =============================================================================

pub(crate) fn invalid_params(details: impl Display) -> McpError {
    McpError::invalid_params(format!("invalid parameters: {details}"), None)
}

/// A check on one field that the binders cannot express.
pub(crate) fn field_error(field: &str, reason: &str) -> McpError {
    invalid_params(format!("field \"{field}\": {reason}"))
}

pub(crate) fn map_error(err: Error) -> McpError {
    match &err {
        Error::InvalidArgument { .. } => McpError::invalid_params(err.to_string(), None),
        Error::NotFound { .. } => McpError::resource_not_found(err.to_string(), None),
        Error::Upstream { status, .. } => {
            McpError::internal_error(err.to_string(), Some(json!({"status": status})))
        }
        Error::Transport { source } => McpError::internal_error(
            err.to_string(),
            Some(json!({"error": source.to_string()})),
        ),
        Error::Decode { .. } | Error::Cancelled => McpError::internal_error(err.to_string(), None),
    }
}

pub(crate) fn bind<'a>(
    args: &Arguments,
    binders: impl IntoIterator<Item = Binder<'a>>,
) -> Result<(), McpError> {
    bind_group(args, binders).map_err(invalid_params)
}

/// Bind the one required id argument of a retrieve or delete tool.
pub(crate) fn required_id(args: &Arguments, key: &'static str) -> Result<i64, McpError> {
    let mut id: i64 = 0;
    bind(args, [required_numeric_param(&mut id, key)])?;
    Ok(id)
}

// =============================================================================
// Execution
// =============================================================================

async fn execute<E: Entity>(
    engine: &Engine,
    ct: &CancellationToken,
    entity: &mut E,
) -> Result<(), McpError> {
    engine
        .execute(ct, entity, vec![with_span(request_span::<E>())])
        .await
        .map_err(map_error)
}

/// Child of the tool or resource span, naming the entity being executed.
fn request_span<E>() -> Span {
    debug_span!("twapi.request", entity = std::any::type_name::<E>())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(
            "serialization_error",
            Some(json!({"error": e.to_string()})),
        )
    })
}

/// Execute a `Single` and return the decoded resource.
pub(crate) async fn fetch_one<E: SingleResponse>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
) -> Result<CallToolResult, McpError> {
    execute(&engine, &ct, &mut entity).await?;
    Ok(CallToolResult::success(vec![Content::text(to_json(
        entity.response(),
    )?)]))
}

/// Execute a `Multiple` and return `{"items": [...], "meta": {...}}`.
pub(crate) async fn fetch_page<E: ListResponse>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
) -> Result<CallToolResult, McpError> {
    execute(&engine, &ct, &mut entity).await?;
    let response = json!({
        "items": entity.items(),
        "meta": entity.meta(),
    });
    Ok(CallToolResult::success(vec![Content::text(to_json(
        &response,
    )?)]))
}

/// Execute a `Create`. The first content item is the confirmation; the
/// server-assigned id follows as `{"id": n}` when the upstream sent one.
pub(crate) async fn create<E: Entity>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
    resource: &str,
) -> Result<CallToolResult, McpError> {
    let created = Arc::new(OnceLock::new());
    let sink = Arc::clone(&created);
    engine
        .execute(
            &ct,
            &mut entity,
            vec![
                with_span(request_span::<E>()),
                with_id_callback("id", move |id| {
                    let _ = sink.set(id);
                }),
            ],
        )
        .await
        .map_err(map_error)?;

    let mut content = vec![Content::text(format!("{resource} created successfully"))];
    if let Some(id) = created.get() {
        info!(resource, id, "created");
        content.push(Content::text(json!({"id": id}).to_string()));
    }
    Ok(CallToolResult::success(content))
}

/// Execute a write without a useful body and confirm with `message`.
pub(crate) async fn confirm<E: Entity>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
    message: String,
) -> Result<CallToolResult, McpError> {
    execute(&engine, &ct, &mut entity).await?;
    Ok(CallToolResult::success(vec![Content::text(message)]))
}

// =============================================================================
// Resources
// =============================================================================

/// Read one page and expose each element at `<base>/<id>`.
pub(crate) async fn read_page<E: ListResponse>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
    base: &str,
) -> Result<Vec<ResourceContents>, McpError> {
    execute(&engine, &ct, &mut entity).await?;
    entity
        .items()
        .iter()
        .map(|item| {
            let value = serde_json::to_value(item).map_err(|e| {
                McpError::internal_error(
                    "serialization_error",
                    Some(json!({"error": e.to_string()})),
                )
            })?;
            let uri = match value.get("id").and_then(Value::as_i64) {
                Some(id) => format!("{base}/{id}"),
                None => base.to_string(),
            };
            Ok(ResourceContents::text(to_json(&value)?, uri))
        })
        .collect()
}

pub(crate) async fn read_one<E: SingleResponse>(
    engine: Engine,
    ct: CancellationToken,
    mut entity: E,
    uri: String,
) -> Result<Vec<ResourceContents>, McpError> {
    execute(&engine, &ct, &mut entity).await?;
    Ok(vec![ResourceContents::text(
        to_json(entity.response())?,
        uri,
    )])
}

// =============================================================================
// Shared arguments
// =============================================================================

/// Arguments of a tool that takes none.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct PageParams {
    #[schemars(description = "Page number to retrieve, starting at 1", range(min = 1))]
    pub page: Option<i64>,
    #[schemars(description = "Number of items per page", range(min = 1))]
    pub page_size: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct SearchParams {
    #[schemars(description = "Only items whose name or description contains this text")]
    pub search_term: Option<String>,
    #[schemars(description = "Only items carrying these tags")]
    pub tag_ids: Option<Vec<i64>>,
    #[schemars(description = "Require every tag in tag-ids instead of any of them")]
    pub match_all_tags: Option<bool>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

/// Users, companies and teams, each as a list of ids.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[schemars(inline)]
pub struct UserGroupsParams {
    #[schemars(description = "User ids")]
    pub user_ids: Option<Vec<i64>>,
    #[schemars(description = "Company ids")]
    pub company_ids: Option<Vec<i64>>,
    #[schemars(description = "Team ids")]
    pub team_ids: Option<Vec<i64>>,
}

pub(crate) fn pagination_binders(pagination: &mut Pagination) -> Vec<Binder<'_>> {
    let Pagination { page, page_size } = pagination;
    vec![
        optional_numeric_pointer_param(page, "page").at_least(1),
        optional_numeric_pointer_param(page_size, "page-size").at_least(1),
    ]
}

pub(crate) fn search_binders(filters: &mut SearchFilters) -> Vec<Binder<'_>> {
    let SearchFilters {
        search_term,
        tag_ids,
        match_all_tags,
        pagination,
    } = filters;
    let mut binders = vec![
        optional_pointer_param(search_term, "search-term"),
        optional_numeric_list_param(tag_ids, "tag-ids"),
        optional_pointer_param(match_all_tags, "match-all-tags"),
    ];
    binders.extend(pagination_binders(pagination));
    binders
}

pub(crate) fn bind_user_groups(args: &Arguments, groups: &mut UserGroups) -> Result<(), BindError> {
    let UserGroups {
        user_ids,
        company_ids,
        team_ids,
    } = groups;
    bind_group(
        args,
        [
            optional_numeric_list_param(user_ids, "user-ids"),
            optional_numeric_list_param(company_ids, "company-ids"),
            optional_numeric_list_param(team_ids, "team-ids"),
        ],
    )
}
