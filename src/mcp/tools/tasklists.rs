//! Tasklist tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, bind, confirm, create, fetch_one, fetch_page, read_one, read_page,
    required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_numeric_pointer_param, optional_pointer_param,
    required_numeric_param, required_param,
};
use crate::twapi::{Engine, tasklists};

const URI: &str = "twapi://tasklists";
const TEMPLATE: &str = "twapi://tasklists/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasklistsParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectTasklistsParams {
    #[schemars(description = "Project whose tasklists to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetTasklistParams {
    #[schemars(description = "Tasklist ID")]
    pub tasklist_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TasklistFieldParams {
    #[schemars(description = "Tasklist description")]
    pub description: Option<String>,
    #[schemars(description = "Milestone the tasklist contributes to")]
    pub milestone_id: Option<i64>,
    #[schemars(description = "Only visible to the project's owner company")]
    pub private: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateTasklistParams {
    #[schemars(description = "Project the tasklist belongs to")]
    pub project_id: i64,
    #[schemars(description = "Tasklist name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: TasklistFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTasklistParams {
    #[schemars(description = "Tasklist ID to update")]
    pub tasklist_id: i64,
    #[schemars(description = "Tasklist name")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: TasklistFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "tasklists", "First page of tasklists across all projects", |engine, ct| {
        read_page(engine, ct, tasklists::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "tasklist", "A single tasklist by id", |engine, id, ct| {
        let single = tasklists::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTasklistsParams>(
        "retrieve-tasklists",
        "List tasklists across all projects. Filter by search term or tags; results are paginated.",
        retrieve_tasklists,
    )?;
    catalog.tool::<ListProjectTasklistsParams>(
        "retrieve-project-tasklists",
        "List the tasklists of one project. Filter by search term or tags; results are paginated.",
        retrieve_project_tasklists,
    )?;
    catalog.tool::<GetTasklistParams>(
        "retrieve-tasklist",
        "Get a tasklist by id.",
        retrieve_tasklist,
    )?;
    catalog.tool::<CreateTasklistParams>(
        "create-tasklist",
        "Create a tasklist in a project.",
        create_tasklist,
    )?;
    catalog.tool::<UpdateTasklistParams>(
        "update-tasklist",
        "Update a tasklist. Only the given fields change.",
        update_tasklist,
    )?;
    catalog.tool::<GetTasklistParams>(
        "delete-tasklist",
        "Delete a tasklist and its tasks.",
        delete_tasklist,
    )?;
    Ok(())
}

fn field_binders(fields: &mut tasklists::Fields) -> Vec<Binder<'_>> {
    let tasklists::Fields {
        description,
        milestone_id,
        private,
    } = fields;
    vec![
        optional_pointer_param(description, "description"),
        optional_numeric_pointer_param(milestone_id, "milestone-id"),
        optional_pointer_param(private, "private"),
    ]
}

pub(super) fn bind_multiple(
    args: &Arguments,
    scoped: bool,
) -> Result<tasklists::Multiple, McpError> {
    let mut multiple = tasklists::Multiple::default();
    let mut project_id: i64 = 0;
    let mut binders = search_binders(&mut multiple.filters);
    if scoped {
        binders.push(required_numeric_param(&mut project_id, "project-id"));
    }
    bind(args, binders)?;
    if scoped {
        multiple.path.project_id = Some(project_id);
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<tasklists::Create, McpError> {
    let mut create = tasklists::Create::default();
    let tasklists::Create {
        project_id,
        name,
        fields,
    } = &mut create;
    let mut binders = vec![
        required_numeric_param(project_id, "project-id"),
        required_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<tasklists::Update, McpError> {
    let mut update = tasklists::Update::default();
    let tasklists::Update { id, name, fields } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "tasklist-id"),
        optional_pointer_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(update)
}

async fn retrieve_tasklists(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_project_tasklists(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}

async fn retrieve_tasklist(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = tasklists::Single {
        id: required_id(&args, "tasklist-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_tasklist(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Tasklist").await
}

async fn update_tasklist(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Tasklist updated successfully".to_string()).await
}

async fn delete_tasklist(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = tasklists::Delete {
        id: required_id(&args, "tasklist-id")?,
    };
    confirm(engine, ct, delete, "Tasklist deleted successfully".to_string()).await
}
