//! Activities: the site-wide (or per-project) feed of recent changes. Read-only.

use chrono::{DateTime, Utc};
use reqwest::{Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse};
use super::error::Result;
use super::request::{Query, V3, decode_list, get};
use super::types::{PageMeta, Pagination};

/// Log item types accepted by the `activityTypes` filter.
pub const LOG_ITEM_TYPES: &[&str] = &[
    "message",
    "comment",
    "task",
    "tasklist",
    "taskgroup",
    "milestone",
    "file",
    "form",
    "notebook",
    "timelog",
    "task_comment",
    "notebook_comment",
    "file_comment",
    "link_comment",
    "milestone_comment",
    "project",
    "link",
    "billingInvoice",
    "risk",
    "projectUpdate",
    "reacted",
    "budget",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub id: i64,
    pub activity_type: Option<String>,
    pub item_type: Option<String>,
    pub item_id: Option<i64>,
    pub item_link: Option<String>,
    pub description: Option<String>,
    pub extra_description: Option<String>,
    pub project_id: Option<i64>,
    pub user_id: Option<i64>,
    pub for_user_id: Option<i64>,
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub log_item_types: Vec<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: Filters,
    pub response: Vec<Activity>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.project_id {
            Some(project_id) => format!("{V3}/projects/{project_id}/latestactivity.json"),
            None => format!("{V3}/latestactivity.json"),
        };
        let filters = &self.filters;
        let mut query = Query::default();
        query
            .datetime("startDate", filters.start_date)
            .datetime("endDate", filters.end_date)
            .list("activityTypes", &filters.log_item_types);
        filters.pagination.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "activities")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Activity;

    fn items(&self) -> &[Activity] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}
