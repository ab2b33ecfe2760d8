//! Timelog tools and resources.

use chrono::{NaiveDate, NaiveTime};
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, PageParams, bind, confirm, create, fetch_one, fetch_page, field_error,
    pagination_binders, read_one, read_page, required_id,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_date_pointer_param, optional_numeric_list_param,
    optional_numeric_list_pointer_param, optional_numeric_param, optional_numeric_pointer_param,
    optional_pointer_param, optional_time_only_pointer_param, required_date_param,
    required_numeric_param, required_time_only_param,
};
use crate::twapi::timelogs::{self, Target};
use crate::twapi::Engine;

const URI: &str = "twapi://timelogs";
const TEMPLATE: &str = "twapi://timelogs/{id}";

/// `HH:MM:SS`
const TIME_PATTERN: &str = r"^\d{2}:\d{2}:\d{2}$";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TimelogFilterParams {
    #[schemars(description = "Only entries on or after this day")]
    pub start_date: Option<NaiveDate>,
    #[schemars(description = "Only entries on or before this day")]
    pub end_date: Option<NaiveDate>,
    #[schemars(description = "Only entries carrying these tags")]
    pub tag_ids: Option<Vec<i64>>,
    #[schemars(description = "Require every tag in tag-ids instead of any of them")]
    pub match_all_tags: Option<bool>,
    #[schemars(description = "Only entries logged by these users")]
    pub assigned_user_ids: Option<Vec<i64>>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTimelogsParams {
    #[serde(flatten)]
    pub filters: TimelogFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectTimelogsParams {
    #[schemars(description = "Project whose time entries to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub filters: TimelogFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListTaskTimelogsParams {
    #[schemars(description = "Task whose time entries to list")]
    pub task_id: i64,
    #[serde(flatten)]
    pub filters: TimelogFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetTimelogParams {
    #[schemars(description = "Time entry ID")]
    pub timelog_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TimelogEntryParams {
    #[schemars(description = "What the time was spent on")]
    pub description: Option<String>,
    #[schemars(description = "Whether date and time are UTC instead of the user's timezone")]
    pub is_utc: Option<bool>,
    #[schemars(description = "Whole hours spent", range(min = 0))]
    pub hours: Option<i64>,
    #[schemars(description = "Minutes spent on top of hours", range(min = 0))]
    pub minutes: Option<i64>,
    #[schemars(description = "Whether the time is billable")]
    pub is_billable: Option<bool>,
    #[schemars(description = "Log on behalf of this user")]
    pub user_id: Option<i64>,
    #[schemars(description = "Tags applied to the entry")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateTimelogParams {
    #[schemars(description = "Project to log time against")]
    pub project_id: Option<i64>,
    #[schemars(description = "Task to log time against")]
    pub task_id: Option<i64>,
    #[schemars(description = "Day the work happened (YYYY-MM-DD)")]
    pub date: NaiveDate,
    #[schemars(description = "Time the work started (HH:MM:SS)", pattern(TIME_PATTERN))]
    pub time: String,
    #[serde(flatten)]
    pub entry: TimelogEntryParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTimelogParams {
    #[schemars(description = "Time entry ID to update")]
    pub timelog_id: i64,
    #[schemars(description = "Day the work happened (YYYY-MM-DD)")]
    pub date: Option<NaiveDate>,
    #[schemars(description = "Time the work started (HH:MM:SS)", pattern(TIME_PATTERN))]
    pub time: Option<String>,
    #[serde(flatten)]
    pub entry: TimelogEntryParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "timelogs", "First page of time entries across all projects", |engine, ct| {
        read_page(engine, ct, timelogs::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "timelog", "A single time entry by id", |engine, id, ct| {
        let single = timelogs::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTimelogsParams>(
        "retrieve-timelogs",
        "List time entries across all projects. Filter by date range, tags or users; results are paginated.",
        retrieve_timelogs,
    )?;
    catalog.tool::<ListProjectTimelogsParams>(
        "retrieve-project-timelogs",
        "List the time entries of one project. Filter by date range, tags or users; results are paginated.",
        retrieve_project_timelogs,
    )?;
    catalog.tool::<ListTaskTimelogsParams>(
        "retrieve-task-timelogs",
        "List the time entries of one task. Filter by date range, tags or users; results are paginated.",
        retrieve_task_timelogs,
    )?;
    catalog.tool::<GetTimelogParams>(
        "retrieve-timelog",
        "Get a time entry by id.",
        retrieve_timelog,
    )?;
    catalog.tool::<CreateTimelogParams>(
        "create-timelog",
        "Log time against a project or a task. Give exactly one of project-id and task-id.",
        create_timelog,
    )?;
    catalog.tool::<UpdateTimelogParams>(
        "update-timelog",
        "Update a time entry. Only the given fields change.",
        update_timelog,
    )?;
    catalog.tool::<GetTimelogParams>("delete-timelog", "Delete a time entry.", delete_timelog)?;
    Ok(())
}

fn filter_binders(filters: &mut timelogs::Filters) -> Vec<Binder<'_>> {
    let timelogs::Filters {
        start_date,
        end_date,
        tag_ids,
        match_all_tags,
        assigned_user_ids,
        pagination,
    } = filters;
    let mut binders = vec![
        optional_date_pointer_param(start_date, "start-date"),
        optional_date_pointer_param(end_date, "end-date"),
        optional_numeric_list_param(tag_ids, "tag-ids"),
        optional_pointer_param(match_all_tags, "match-all-tags"),
        optional_numeric_list_param(assigned_user_ids, "assigned-user-ids"),
    ];
    binders.extend(pagination_binders(pagination));
    binders
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Scope {
    All,
    Project,
    Task,
}

pub(super) fn bind_multiple(args: &Arguments, scope: Scope) -> Result<timelogs::Multiple, McpError> {
    let mut multiple = timelogs::Multiple::default();
    let mut scope_id: i64 = 0;
    let mut binders = filter_binders(&mut multiple.filters);
    match scope {
        Scope::All => {}
        Scope::Project => binders.push(required_numeric_param(&mut scope_id, "project-id")),
        Scope::Task => binders.push(required_numeric_param(&mut scope_id, "task-id")),
    }
    bind(args, binders)?;
    match scope {
        Scope::All => {}
        Scope::Project => multiple.path.project_id = Some(scope_id),
        Scope::Task => multiple.path.task_id = Some(scope_id),
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<timelogs::Create, McpError> {
    let mut project_id: Option<i64> = None;
    let mut task_id: Option<i64> = None;
    let mut description = None;
    let mut date = NaiveDate::default();
    let mut time = NaiveTime::default();
    let mut is_utc = None;
    let mut hours: u32 = 0;
    let mut minutes: u32 = 0;
    let mut is_billable = None;
    let mut user_id = None;
    let mut tag_ids = Vec::new();
    bind(
        args,
        [
            optional_numeric_pointer_param(&mut project_id, "project-id"),
            optional_numeric_pointer_param(&mut task_id, "task-id"),
            optional_pointer_param(&mut description, "description"),
            required_date_param(&mut date, "date"),
            required_time_only_param(&mut time, "time"),
            optional_pointer_param(&mut is_utc, "is-utc"),
            optional_numeric_param(&mut hours, "hours"),
            optional_numeric_param(&mut minutes, "minutes"),
            optional_pointer_param(&mut is_billable, "is-billable"),
            optional_numeric_pointer_param(&mut user_id, "user-id"),
            optional_numeric_list_param(&mut tag_ids, "tag-ids"),
        ],
    )?;

    let target = match (project_id, task_id) {
        (Some(project_id), None) => Target::Project(project_id),
        (None, Some(task_id)) => Target::Task(task_id),
        (Some(_), Some(_)) => {
            return Err(field_error(
                "task-id",
                "cannot be combined with project-id",
            ));
        }
        (None, None) => {
            return Err(field_error(
                "project-id",
                "either project-id or task-id is required",
            ));
        }
    };
    if hours == 0 && minutes == 0 {
        return Err(field_error("minutes", "hours and minutes cannot both be zero"));
    }

    Ok(timelogs::Create {
        target,
        description,
        date,
        time,
        is_utc,
        hours,
        minutes,
        is_billable,
        user_id,
        tag_ids,
    })
}

pub(super) fn bind_update(args: &Arguments) -> Result<timelogs::Update, McpError> {
    let mut update = timelogs::Update::default();
    let timelogs::Update {
        id,
        description,
        date,
        time,
        is_utc,
        hours,
        minutes,
        is_billable,
        user_id,
        tag_ids,
    } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "timelog-id"),
            optional_pointer_param(description, "description"),
            optional_date_pointer_param(date, "date"),
            optional_time_only_pointer_param(time, "time"),
            optional_pointer_param(is_utc, "is-utc"),
            optional_numeric_pointer_param(hours, "hours"),
            optional_numeric_pointer_param(minutes, "minutes"),
            optional_pointer_param(is_billable, "is-billable"),
            optional_numeric_pointer_param(user_id, "user-id"),
            optional_numeric_list_pointer_param(tag_ids, "tag-ids"),
        ],
    )?;
    if update.hours == Some(0) && update.minutes == Some(0) {
        return Err(field_error("minutes", "hours and minutes cannot both be zero"));
    }
    Ok(update)
}

async fn retrieve_timelogs(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, Scope::All)?).await
}

async fn retrieve_project_timelogs(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, Scope::Project)?).await
}

async fn retrieve_task_timelogs(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, Scope::Task)?).await
}

async fn retrieve_timelog(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = timelogs::Single {
        id: required_id(&args, "timelog-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_timelog(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Timelog").await
}

async fn update_timelog(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Timelog updated successfully".to_string()).await
}

async fn delete_timelog(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = timelogs::Delete {
        id: required_id(&args, "timelog-id")?,
    };
    confirm(engine, ct, delete, "Timelog deleted successfully".to_string()).await
}
