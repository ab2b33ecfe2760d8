//! Team tools and resources. Teams live on the legacy API.

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
use crate::params::{
    Arguments, Binder, optional_numeric_list_param, optional_numeric_pointer_param,
    optional_pointer_param, required_numeric_param, required_param,
};
use crate::serde_utils::LegacyNumber;
use crate::twapi::{Engine, teams};

const URI: &str = "twapi://teams";
const TEMPLATE: &str = "twapi://teams/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListTeamsParams {
    #[schemars(description = "Only teams whose name contains this text")]
    pub search_term: Option<String>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectTeamsParams {
    #[schemars(description = "Project whose teams to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub filters: ListTeamsParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetTeamParams {
    #[schemars(description = "Team ID")]
    pub team_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TeamFieldParams {
    #[schemars(description = "Short handle used to mention the team")]
    pub handle: Option<String>,
    #[schemars(description = "Team description")]
    pub description: Option<String>,
    #[schemars(description = "Make this a sub-team of the given team")]
    pub parent_team_id: Option<i64>,
    #[schemars(description = "Company the team belongs to")]
    pub company_id: Option<i64>,
    #[schemars(description = "Project the team belongs to")]
    pub project_id: Option<i64>,
    #[schemars(description = "Members of the team")]
    pub user_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTeamParams {
    #[schemars(description = "Team name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: TeamFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTeamParams {
    #[schemars(description = "Team ID to update")]
    pub team_id: i64,
    #[schemars(description = "Team name")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: TeamFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "teams", "First page of teams", |engine, ct| {
        read_page(engine, ct, teams::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "team", "A single team by id", |engine, id, ct| {
        let single = teams::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTeamsParams>(
        "retrieve-teams",
        "List teams. Filter by search term; results are paginated.",
        retrieve_teams,
    )?;
    catalog.tool::<ListProjectTeamsParams>(
        "retrieve-project-teams",
        "List the teams working on one project. Filter by search term; results are paginated.",
        retrieve_project_teams,
    )?;
    catalog.tool::<GetTeamParams>("retrieve-team", "Get a team by id.", retrieve_team)?;
    catalog.tool::<CreateTeamParams>(
        "create-team",
        "Create a team. Scope it to a company or a project, or leave it site-wide.",
        create_team,
    )?;
    catalog.tool::<UpdateTeamParams>(
        "update-team",
        "Update a team. Only the given fields change; user-ids replaces the members.",
        update_team,
    )?;
    catalog.tool::<GetTeamParams>("delete-team", "Delete a team.", delete_team)?;
    Ok(())
}

/// Bind the shared fields alongside `binders`. Legacy ids bind as plain
/// integers and are wrapped afterwards.
fn bind_fields(
    args: &Arguments,
    binders: Vec<Binder<'_>>,
    fields: &mut teams::Fields,
) -> Result<(), McpError> {
    let mut parent_team_id: Option<i64> = None;
    let mut company_id: Option<i64> = None;
    let mut project_id: Option<i64> = None;
    let teams::Fields {
        handle,
        description,
        user_ids,
        ..
    } = fields;
    let mut binders: Vec<Binder<'_>> = binders;
    binders.extend([
        optional_pointer_param(handle, "handle"),
        optional_pointer_param(description, "description"),
        optional_numeric_pointer_param(&mut parent_team_id, "parent-team-id"),
        optional_numeric_pointer_param(&mut company_id, "company-id"),
        optional_numeric_pointer_param(&mut project_id, "project-id"),
        optional_numeric_list_param(user_ids, "user-ids"),
    ]);
    bind(args, binders)?;
    fields.parent_team_id = parent_team_id.map(LegacyNumber::from);
    fields.company_id = company_id.map(LegacyNumber::from);
    fields.project_id = project_id.map(LegacyNumber::from);
    Ok(())
}

pub(super) fn bind_multiple(args: &Arguments, scoped: bool) -> Result<teams::Multiple, McpError> {
    let mut multiple = teams::Multiple::default();
    let mut project_id: i64 = 0;
    let teams::Filters {
        search_term,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![optional_pointer_param(search_term, "search-term")];
    binders.extend(pagination_binders(pagination));
    if scoped {
        binders.push(required_numeric_param(&mut project_id, "project-id"));
    }
    bind(args, binders)?;
    if scoped {
        multiple.path.project_id = Some(project_id);
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<teams::Create, McpError> {
    let mut create = teams::Create::default();
    let teams::Create { name, fields } = &mut create;
    bind_fields(args, vec![required_param(name, "name")], fields)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<teams::Update, McpError> {
    let mut update = teams::Update::default();
    let teams::Update { id, name, fields } = &mut update;
    bind_fields(
        args,
        vec![
            required_numeric_param(id, "team-id"),
            optional_pointer_param(name, "name"),
        ],
        fields,
    )?;
    Ok(update)
}

async fn retrieve_teams(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_project_teams(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}

async fn retrieve_team(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = teams::Single {
        id: required_id(&args, "team-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_team(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Team").await
}

async fn update_team(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Team updated successfully".to_string()).await
}

async fn delete_team(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = teams::Delete {
        id: required_id(&args, "team-id")?,
    };
    confirm(engine, ct, delete, "Team deleted successfully".to_string()).await
}
