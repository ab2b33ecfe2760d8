//! Activity feed tools and resources. The feed is read-only.

use chrono::{DateTime, FixedOffset};
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::schemars::{self, JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{Catalog, PageParams, bind, fetch_page, pagination_binders, read_page};
use crate::mcp::registry::RegistryError;
use crate::params::{Arguments, optional_list_param, optional_time_param, required_numeric_param};
use crate::twapi::activities::{self, LOG_ITEM_TYPES};
use crate::twapi::Engine;

const URI: &str = "twapi://activities";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ActivityFilterParams {
    #[schemars(description = "Only activity at or after this instant (RFC 3339)")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[schemars(description = "Only activity at or before this instant (RFC 3339)")]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "log_item_types_schema")]
    pub log_item_types: Option<Vec<String>>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

fn log_item_types_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "array",
        "description": "Only activity on these kinds of item",
        "items": {"type": "string", "enum": LOG_ITEM_TYPES},
    })
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListActivitiesParams {
    #[serde(flatten)]
    pub filters: ActivityFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectActivitiesParams {
    #[schemars(description = "Project whose activity to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub filters: ActivityFilterParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "activities", "Latest activity across the site", |engine, ct| {
        read_page(engine, ct, activities::Multiple::default(), URI)
    })?;
    catalog.tool::<ListActivitiesParams>(
        "retrieve-activities",
        "List the latest activity across the site. Filter by time window or item type; results are paginated.",
        retrieve_activities,
    )?;
    catalog.tool::<ListProjectActivitiesParams>(
        "retrieve-project-activities",
        "List the latest activity of one project. Filter by time window or item type; results are paginated.",
        retrieve_project_activities,
    )?;
    Ok(())
}

pub(super) fn bind_multiple(
    args: &Arguments,
    scoped: bool,
) -> Result<activities::Multiple, McpError> {
    let mut multiple = activities::Multiple::default();
    let mut project_id: i64 = 0;
    let activities::Filters {
        start_date,
        end_date,
        log_item_types,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![
        optional_time_param(start_date, "start-date"),
        optional_time_param(end_date, "end-date"),
        optional_list_param(log_item_types, "log-item-types").restrict(LOG_ITEM_TYPES),
    ];
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

async fn retrieve_activities(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_project_activities(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}
