//! Timer tools and resources. Timers belong to the authenticated user.

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
    Arguments, optional_numeric_pointer_param, optional_pointer_param, required_numeric_param,
};
use crate::twapi::{Engine, timers};

const URI: &str = "twapi://timers";
const TEMPLATE: &str = "twapi://timers/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListTimersParams {
    #[schemars(description = "Only timers of this user")]
    pub user_id: Option<i64>,
    #[schemars(description = "Only timers on this task")]
    pub task_id: Option<i64>,
    #[schemars(description = "Only timers on this project")]
    pub project_id: Option<i64>,
    #[schemars(description = "Only timers that are currently running")]
    pub running_timers_only: Option<bool>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

/// Arguments of every tool acting on one timer by id.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TimerIdParams {
    #[schemars(description = "Timer ID")]
    pub timer_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateTimerParams {
    #[schemars(description = "Project the timer runs against")]
    pub project_id: i64,
    #[schemars(description = "Task the timer runs against")]
    pub task_id: Option<i64>,
    #[schemars(description = "What the time is spent on")]
    pub description: Option<String>,
    #[schemars(description = "Whether the time is billable")]
    pub is_billable: Option<bool>,
    #[schemars(description = "Start immediately instead of creating the timer paused")]
    pub is_running: Option<bool>,
    #[schemars(description = "Pause any other running timer first")]
    pub stop_running_timers: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTimerParams {
    #[schemars(description = "Timer ID to update")]
    pub timer_id: i64,
    #[schemars(description = "Project the timer runs against")]
    pub project_id: Option<i64>,
    #[schemars(description = "Task the timer runs against")]
    pub task_id: Option<i64>,
    #[schemars(description = "What the time is spent on")]
    pub description: Option<String>,
    #[schemars(description = "Whether the time is billable")]
    pub is_billable: Option<bool>,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "timers", "First page of timers", |engine, ct| {
        read_page(engine, ct, timers::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "timer", "A single timer by id", |engine, id, ct| {
        let single = timers::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTimersParams>(
        "retrieve-timers",
        "List timers. Filter by user, task, project or running state; results are paginated.",
        retrieve_timers,
    )?;
    catalog.tool::<TimerIdParams>("retrieve-timer", "Get a timer by id.", retrieve_timer)?;
    catalog.tool::<CreateTimerParams>(
        "create-timer",
        "Start a timer on a project, optionally on one of its tasks.",
        create_timer,
    )?;
    catalog.tool::<UpdateTimerParams>(
        "update-timer",
        "Update a timer. Only the given fields change.",
        update_timer,
    )?;
    catalog.tool::<TimerIdParams>(
        "pause-timer",
        "Pause a running timer, keeping the time accumulated so far.",
        pause_timer,
    )?;
    catalog.tool::<TimerIdParams>("resume-timer", "Resume a paused timer.", resume_timer)?;
    catalog.tool::<TimerIdParams>(
        "complete-timer",
        "Stop a timer for good and log its duration as a time entry.",
        complete_timer,
    )?;
    catalog.tool::<TimerIdParams>(
        "delete-timer",
        "Delete a timer without logging its time.",
        delete_timer,
    )?;
    Ok(())
}

pub(super) fn bind_multiple(args: &Arguments) -> Result<timers::Multiple, McpError> {
    let mut multiple = timers::Multiple::default();
    let timers::Filters {
        user_id,
        task_id,
        project_id,
        running_timers_only,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![
        optional_numeric_pointer_param(user_id, "user-id"),
        optional_numeric_pointer_param(task_id, "task-id"),
        optional_numeric_pointer_param(project_id, "project-id"),
        optional_pointer_param(running_timers_only, "running-timers-only"),
    ];
    binders.extend(pagination_binders(pagination));
    bind(args, binders)?;
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<timers::Create, McpError> {
    let mut create = timers::Create::default();
    let timers::Create {
        project_id,
        task_id,
        description,
        is_billable,
        is_running,
        stop_running_timers,
    } = &mut create;
    bind(
        args,
        [
            required_numeric_param(project_id, "project-id"),
            optional_numeric_pointer_param(task_id, "task-id"),
            optional_pointer_param(description, "description"),
            optional_pointer_param(is_billable, "is-billable"),
            optional_pointer_param(is_running, "is-running"),
            optional_pointer_param(stop_running_timers, "stop-running-timers"),
        ],
    )?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<timers::Update, McpError> {
    let mut update = timers::Update::default();
    let timers::Update {
        id,
        project_id,
        task_id,
        description,
        is_billable,
    } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "timer-id"),
            optional_numeric_pointer_param(project_id, "project-id"),
            optional_numeric_pointer_param(task_id, "task-id"),
            optional_pointer_param(description, "description"),
            optional_pointer_param(is_billable, "is-billable"),
        ],
    )?;
    Ok(update)
}

async fn retrieve_timers(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args)?).await
}

async fn retrieve_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = timers::Single {
        id: required_id(&args, "timer-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Timer").await
}

async fn update_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Timer updated successfully".to_string()).await
}

async fn pause_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let pause = timers::Pause {
        id: required_id(&args, "timer-id")?,
    };
    confirm(engine, ct, pause, "Timer paused successfully".to_string()).await
}

async fn resume_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let resume = timers::Resume {
        id: required_id(&args, "timer-id")?,
    };
    confirm(engine, ct, resume, "Timer resumed successfully".to_string()).await
}

async fn complete_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let complete = timers::Complete {
        id: required_id(&args, "timer-id")?,
    };
    confirm(engine, ct, complete, "Timer completed successfully".to_string()).await
}

async fn delete_timer(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = timers::Delete {
        id: required_id(&args, "timer-id")?,
    };
    confirm(engine, ct, delete, "Timer deleted successfully".to_string()).await
}
