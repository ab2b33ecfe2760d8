//! Task tools and resources.

use chrono::NaiveDate;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, UserGroupsParams, bind, bind_user_groups, confirm, create, fetch_one,
    fetch_page, field_error, read_one, read_page, required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_date_pointer_param, optional_numeric_list_pointer_param,
    optional_numeric_pointer_param, optional_object_param, optional_pointer_param,
    required_numeric_param, required_param,
};
use crate::twapi::{Engine, tasks};

const URI: &str = "twapi://tasks";
const TEMPLATE: &str = "twapi://tasks/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectTasksParams {
    #[schemars(description = "Project whose tasks to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListTasklistTasksParams {
    #[schemars(description = "Tasklist whose tasks to list")]
    pub tasklist_id: i64,
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetTaskParams {
    #[schemars(description = "Task ID")]
    pub task_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TaskFieldParams {
    #[schemars(description = "Task description")]
    pub description: Option<String>,
    #[schemars(description = "Task priority", extend("enum" = tasks::PRIORITIES))]
    pub priority: Option<String>,
    #[schemars(description = "Completion percentage", range(min = 0, max = 100))]
    pub progress: Option<i64>,
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_at: Option<NaiveDate>,
    #[schemars(description = "Due date (YYYY-MM-DD)")]
    pub due_at: Option<NaiveDate>,
    #[schemars(description = "Estimated effort in minutes", range(min = 0))]
    pub estimated_minutes: Option<i64>,
    #[schemars(description = "Make this a subtask of the given task")]
    pub parent_task_id: Option<i64>,
    #[schemars(description = "Users, companies and teams responsible for the task")]
    pub assignees: Option<UserGroupsParams>,
    #[schemars(description = "Tags applied to the task. An empty list removes every tag.")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateTaskParams {
    #[schemars(description = "Tasklist the task belongs to")]
    pub tasklist_id: i64,
    #[schemars(description = "Task name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: TaskFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTaskParams {
    #[schemars(description = "Task ID to update")]
    pub task_id: i64,
    #[schemars(description = "Task name")]
    pub name: Option<String>,
    #[schemars(description = "Move the task to this tasklist")]
    pub tasklist_id: Option<i64>,
    #[serde(flatten)]
    pub fields: TaskFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "tasks", "First page of tasks across all projects", |engine, ct| {
        read_page(engine, ct, tasks::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "task", "A single task by id", |engine, id, ct| {
        let single = tasks::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTasksParams>(
        "retrieve-tasks",
        "List tasks across all projects. Filter by search term or tags; results are paginated.",
        retrieve_tasks,
    )?;
    catalog.tool::<ListProjectTasksParams>(
        "retrieve-project-tasks",
        "List the tasks of one project. Filter by search term or tags; results are paginated.",
        retrieve_project_tasks,
    )?;
    catalog.tool::<ListTasklistTasksParams>(
        "retrieve-tasklist-tasks",
        "List the tasks of one tasklist. Filter by search term or tags; results are paginated.",
        retrieve_tasklist_tasks,
    )?;
    catalog.tool::<GetTaskParams>("retrieve-task", "Get a task by id.", retrieve_task)?;
    catalog.tool::<CreateTaskParams>(
        "create-task",
        "Create a task in a tasklist. Use retrieve-project-tasklists to find the tasklist.",
        create_task,
    )?;
    catalog.tool::<UpdateTaskParams>(
        "update-task",
        "Update a task. Only the given fields change; tag-ids and assignees replace the current values.",
        update_task,
    )?;
    catalog.tool::<GetTaskParams>("delete-task", "Delete a task.", delete_task)?;
    Ok(())
}

fn field_binders(fields: &mut tasks::Fields) -> Vec<Binder<'_>> {
    let tasks::Fields {
        description,
        priority,
        progress,
        start_at,
        due_at,
        estimated_minutes,
        parent_task_id,
        assignees,
        tag_ids,
    } = fields;
    vec![
        optional_pointer_param(description, "description"),
        optional_pointer_param(priority, "priority").restrict(tasks::PRIORITIES),
        optional_numeric_pointer_param(progress, "progress"),
        optional_date_pointer_param(start_at, "start-at"),
        optional_date_pointer_param(due_at, "due-at"),
        optional_numeric_pointer_param(estimated_minutes, "estimated-minutes"),
        optional_numeric_pointer_param(parent_task_id, "parent-task-id"),
        optional_object_param(assignees, "assignees", bind_user_groups),
        optional_numeric_list_pointer_param(tag_ids, "tag-ids"),
    ]
}

fn check_fields(fields: &tasks::Fields) -> Result<(), McpError> {
    if fields.progress.is_some_and(|p| !(0..=100).contains(&p)) {
        return Err(field_error("progress", "must be between 0 and 100"));
    }
    if fields.estimated_minutes.is_some_and(|m| m < 0) {
        return Err(field_error("estimated-minutes", "must not be negative"));
    }
    if let (Some(start), Some(due)) = (fields.start_at, fields.due_at) {
        if due < start {
            return Err(field_error("due-at", "must not be before start-at"));
        }
    }
    Ok(())
}

pub(super) fn bind_multiple(
    args: &Arguments,
    scope: Option<&'static str>,
) -> Result<tasks::Multiple, McpError> {
    let mut multiple = tasks::Multiple::default();
    let mut scope_id: i64 = 0;
    let mut binders = search_binders(&mut multiple.filters);
    if let Some(key) = scope {
        binders.push(required_numeric_param(&mut scope_id, key));
    }
    bind(args, binders)?;
    match scope {
        Some("project-id") => multiple.path.project_id = Some(scope_id),
        Some(_) => multiple.path.tasklist_id = Some(scope_id),
        None => {}
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<tasks::Create, McpError> {
    let mut create = tasks::Create::default();
    let tasks::Create {
        tasklist_id,
        name,
        fields,
    } = &mut create;
    let mut binders = vec![
        required_numeric_param(tasklist_id, "tasklist-id"),
        required_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    check_fields(&create.fields)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<tasks::Update, McpError> {
    let mut update = tasks::Update::default();
    let tasks::Update {
        id,
        name,
        tasklist_id,
        fields,
    } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "task-id"),
        optional_pointer_param(name, "name"),
        optional_numeric_pointer_param(tasklist_id, "tasklist-id"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    check_fields(&update.fields)?;
    Ok(update)
}

async fn retrieve_tasks(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, None)?).await
}

async fn retrieve_project_tasks(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, Some("project-id"))?).await
}

async fn retrieve_tasklist_tasks(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, Some("tasklist-id"))?).await
}

async fn retrieve_task(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = tasks::Single {
        id: required_id(&args, "task-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_task(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Task").await
}

async fn update_task(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Task updated successfully".to_string()).await
}

async fn delete_task(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = tasks::Delete {
        id: required_id(&args, "task-id")?,
    };
    confirm(engine, ct, delete, "Task deleted successfully".to_string()).await
}
