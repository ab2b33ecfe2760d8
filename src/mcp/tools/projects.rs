//! Project tools and resources.

use chrono::NaiveDate;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, bind, confirm, create, fetch_one, fetch_page, field_error, read_one,
    read_page, required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_date_pointer_param, optional_numeric_list_pointer_param,
    optional_numeric_pointer_param, optional_pointer_param, required_numeric_param,
    required_param,
};
use crate::twapi::{Engine, projects};

const URI: &str = "twapi://projects";
const TEMPLATE: &str = "twapi://projects/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectsParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetProjectParams {
    #[schemars(description = "Project ID")]
    pub project_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectFieldParams {
    #[schemars(description = "Project description")]
    pub description: Option<String>,
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_at: Option<NaiveDate>,
    #[schemars(description = "End date (YYYY-MM-DD)")]
    pub end_at: Option<NaiveDate>,
    #[schemars(description = "Client company of the project")]
    pub company_id: Option<i64>,
    #[schemars(description = "User who owns the project")]
    pub owner_id: Option<i64>,
    #[schemars(description = "Tags applied to the project. An empty list removes every tag.")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateProjectParams {
    #[schemars(description = "Project name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: ProjectFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateProjectParams {
    #[schemars(description = "Project ID to update")]
    pub project_id: i64,
    #[schemars(description = "Project name")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: ProjectFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "projects", "First page of projects", |engine, ct| {
        read_page(engine, ct, projects::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "project", "A single project by id", |engine, id, ct| {
        let single = projects::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListProjectsParams>(
        "retrieve-projects",
        "List projects. Filter by search term or tags; results are paginated.",
        retrieve_projects,
    )?;
    catalog.tool::<GetProjectParams>(
        "retrieve-project",
        "Get a project by id.",
        retrieve_project,
    )?;
    catalog.tool::<CreateProjectParams>("create-project", "Create a project.", create_project)?;
    catalog.tool::<UpdateProjectParams>(
        "update-project",
        "Update a project. Only the given fields change.",
        update_project,
    )?;
    catalog.tool::<GetProjectParams>(
        "delete-project",
        "Delete a project and everything in it.",
        delete_project,
    )?;
    Ok(())
}

fn field_binders(fields: &mut projects::Fields) -> Vec<Binder<'_>> {
    let projects::Fields {
        description,
        start_at,
        end_at,
        company_id,
        owner_id,
        tag_ids,
    } = fields;
    vec![
        optional_pointer_param(description, "description"),
        optional_date_pointer_param(start_at, "start-at"),
        optional_date_pointer_param(end_at, "end-at"),
        optional_numeric_pointer_param(company_id, "company-id"),
        optional_numeric_pointer_param(owner_id, "owner-id"),
        optional_numeric_list_pointer_param(tag_ids, "tag-ids"),
    ]
}

fn check_fields(fields: &projects::Fields) -> Result<(), McpError> {
    if let (Some(start), Some(end)) = (fields.start_at, fields.end_at) {
        if end < start {
            return Err(field_error("end-at", "must not be before start-at"));
        }
    }
    Ok(())
}

pub(super) fn bind_create(args: &Arguments) -> Result<projects::Create, McpError> {
    let mut create = projects::Create::default();
    let projects::Create { name, fields } = &mut create;
    let mut binders = vec![required_param(name, "name")];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    check_fields(&create.fields)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<projects::Update, McpError> {
    let mut update = projects::Update::default();
    let projects::Update { id, name, fields } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "project-id"),
        optional_pointer_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    check_fields(&update.fields)?;
    Ok(update)
}

async fn retrieve_projects(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let mut multiple = projects::Multiple::default();
    bind(&args, search_binders(&mut multiple.filters))?;
    fetch_page(engine, ct, multiple).await
}

async fn retrieve_project(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = projects::Single {
        id: required_id(&args, "project-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_project(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Project").await
}

async fn update_project(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Project updated successfully".to_string()).await
}

async fn delete_project(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = projects::Delete {
        id: required_id(&args, "project-id")?,
    };
    confirm(engine, ct, delete, "Project deleted successfully".to_string()).await
}
