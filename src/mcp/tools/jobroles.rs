//! Job role tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, PageParams, bind, confirm, create, fetch_one, fetch_page, pagination_binders,
    read_one, read_page, required_id,
};
use crate::mcp::registry::RegistryError;
use crate::params::{Arguments, optional_pointer_param, required_numeric_param, required_param};
use crate::twapi::{Engine, jobroles};

const URI: &str = "twapi://jobroles";
const TEMPLATE: &str = "twapi://jobroles/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListJobRolesParams {
    #[schemars(description = "Only job roles whose name contains this text")]
    pub search_term: Option<String>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetJobRoleParams {
    #[schemars(description = "Job role ID")]
    pub jobrole_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateJobRoleParams {
    #[schemars(description = "Job role name")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateJobRoleParams {
    #[schemars(description = "Job role ID to update")]
    pub jobrole_id: i64,
    #[schemars(description = "Job role name")]
    pub name: Option<String>,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "jobroles", "First page of job roles", |engine, ct| {
        read_page(engine, ct, jobroles::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "jobrole", "A single job role by id", |engine, id, ct| {
        let single = jobroles::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListJobRolesParams>(
        "retrieve-jobroles",
        "List job roles. Filter by search term; results are paginated.",
        retrieve_jobroles,
    )?;
    catalog.tool::<GetJobRoleParams>("retrieve-jobrole", "Get a job role by id.", retrieve_jobrole)?;
    catalog.tool::<CreateJobRoleParams>("create-jobrole", "Create a job role.", create_jobrole)?;
    catalog.tool::<UpdateJobRoleParams>("update-jobrole", "Rename a job role.", update_jobrole)?;
    catalog.tool::<GetJobRoleParams>("delete-jobrole", "Delete a job role.", delete_jobrole)?;
    Ok(())
}

pub(super) fn bind_multiple(args: &Arguments) -> Result<jobroles::Multiple, McpError> {
    let mut multiple = jobroles::Multiple::default();
    let jobroles::Filters {
        search_term,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![optional_pointer_param(search_term, "search-term")];
    binders.extend(pagination_binders(pagination));
    bind(args, binders)?;
    Ok(multiple)
}

async fn retrieve_jobroles(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args)?).await
}

async fn retrieve_jobrole(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = jobroles::Single {
        id: required_id(&args, "jobrole-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

fn bind_create(args: &Arguments) -> Result<jobroles::Create, McpError> {
    let mut create = jobroles::Create::default();
    bind(args, [required_param(&mut create.name, "name")])?;
    Ok(create)
}

fn bind_update(args: &Arguments) -> Result<jobroles::Update, McpError> {
    let mut update = jobroles::Update::default();
    let jobroles::Update { id, name } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "jobrole-id"),
            optional_pointer_param(name, "name"),
        ],
    )?;
    Ok(update)
}

async fn create_jobrole(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Job role").await
}

async fn update_jobrole(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Job role updated successfully".to_string()).await
}

async fn delete_jobrole(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = jobroles::Delete {
        id: required_id(&args, "jobrole-id")?,
    };
    confirm(engine, ct, delete, "Job role deleted successfully".to_string()).await
}
