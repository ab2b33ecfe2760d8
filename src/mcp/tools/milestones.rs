//! Milestone tools and resources.

use chrono::NaiveDate;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, UserGroupsParams, bind, bind_user_groups, confirm, create, fetch_one,
    fetch_page, read_one, read_page, required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_date_pointer_param, optional_numeric_list_pointer_param,
    optional_object_param, optional_pointer_param, required_numeric_param, required_param,
};
use crate::twapi::{Engine, LegacyUserGroups, milestones};

const URI: &str = "twapi://milestones";
const TEMPLATE: &str = "twapi://milestones/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListMilestonesParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectMilestonesParams {
    #[schemars(description = "Project whose milestones to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetMilestoneParams {
    #[schemars(description = "Milestone ID")]
    pub milestone_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct MilestoneFieldParams {
    #[schemars(description = "Milestone description")]
    pub description: Option<String>,
    #[schemars(description = "Deadline (YYYY-MM-DD)")]
    pub deadline: Option<NaiveDate>,
    #[schemars(description = "Users, companies and teams responsible for the milestone")]
    pub assignees: Option<UserGroupsParams>,
    #[schemars(description = "Tasklists attached to the milestone. An empty list detaches all.")]
    pub tasklist_ids: Option<Vec<i64>>,
    #[schemars(description = "Tags applied to the milestone. An empty list removes every tag.")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateMilestoneParams {
    #[schemars(description = "Project the milestone belongs to")]
    pub project_id: i64,
    #[schemars(description = "Milestone name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: MilestoneFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateMilestoneParams {
    #[schemars(description = "Milestone ID to update")]
    pub milestone_id: i64,
    #[schemars(description = "Milestone name")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: MilestoneFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "milestones", "First page of milestones across all projects", |engine, ct| {
        read_page(engine, ct, milestones::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "milestone", "A single milestone by id", |engine, id, ct| {
        let single = milestones::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListMilestonesParams>(
        "retrieve-milestones",
        "List milestones across all projects. Filter by search term or tags; results are paginated.",
        retrieve_milestones,
    )?;
    catalog.tool::<ListProjectMilestonesParams>(
        "retrieve-project-milestones",
        "List the milestones of one project. Filter by search term or tags; results are paginated.",
        retrieve_project_milestones,
    )?;
    catalog.tool::<GetMilestoneParams>(
        "retrieve-milestone",
        "Get a milestone by id.",
        retrieve_milestone,
    )?;
    catalog.tool::<CreateMilestoneParams>(
        "create-milestone",
        "Create a milestone in a project. A deadline and at least one assignee are expected by Teamwork.",
        create_milestone,
    )?;
    catalog.tool::<UpdateMilestoneParams>(
        "update-milestone",
        "Update a milestone. Only the given fields change.",
        update_milestone,
    )?;
    catalog.tool::<GetMilestoneParams>(
        "delete-milestone",
        "Delete a milestone.",
        delete_milestone,
    )?;
    Ok(())
}

fn field_binders(fields: &mut milestones::Fields) -> Vec<Binder<'_>> {
    let milestones::Fields {
        description,
        deadline,
        assignees,
        tasklist_ids,
        tag_ids,
    } = fields;
    vec![
        optional_pointer_param(description, "description"),
        optional_date_pointer_param(deadline, "deadline"),
        optional_object_param(assignees, "assignees", |args, groups: &mut LegacyUserGroups| {
            bind_user_groups(args, &mut groups.0)
        }),
        optional_numeric_list_pointer_param(tasklist_ids, "tasklist-ids"),
        optional_numeric_list_pointer_param(tag_ids, "tag-ids"),
    ]
}

pub(super) fn bind_multiple(
    args: &Arguments,
    scoped: bool,
) -> Result<milestones::Multiple, McpError> {
    let mut multiple = milestones::Multiple::default();
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

pub(super) fn bind_create(args: &Arguments) -> Result<milestones::Create, McpError> {
    let mut create = milestones::Create::default();
    let milestones::Create {
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

pub(super) fn bind_update(args: &Arguments) -> Result<milestones::Update, McpError> {
    let mut update = milestones::Update::default();
    let milestones::Update { id, name, fields } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "milestone-id"),
        optional_pointer_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(update)
}

async fn retrieve_milestones(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_project_milestones(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}

async fn retrieve_milestone(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = milestones::Single {
        id: required_id(&args, "milestone-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_milestone(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Milestone").await
}

async fn update_milestone(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Milestone updated successfully".to_string()).await
}

async fn delete_milestone(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = milestones::Delete {
        id: required_id(&args, "milestone-id")?,
    };
    confirm(engine, ct, delete, "Milestone deleted successfully".to_string()).await
}
