//! Tasks: the unit of work, always inside a tasklist.

use chrono::NaiveDate;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Relationship, SearchFilters, UserGroups};

pub const PRIORITIES: &[&str] = &["low", "medium", "high"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub progress: Option<i64>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub estimate_minutes: Option<i64>,
    pub parent_task_id: Option<i64>,
    pub tasklist_id: Option<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub assignees: Vec<Relationship>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tags: Vec<Relationship>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Task,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/tasks/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "task")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Task;

    fn response(&self) -> &Task {
        &self.response
    }
}

/// Scope of a task listing. A tasklist wins over a project when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
    pub tasklist_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: SearchFilters,
    pub response: Vec<Task>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match (self.path.tasklist_id, self.path.project_id) {
            (Some(tasklist_id), _) => format!("{V3}/tasklists/{tasklist_id}/tasks.json"),
            (None, Some(project_id)) => format!("{V3}/projects/{project_id}/tasks.json"),
            (None, None) => format!("{V3}/tasks.json"),
        };
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "tasks")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Task;

    fn items(&self) -> &[Task] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<UserGroups>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    #[serde(skip)]
    pub tasklist_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::POST,
            server,
            &format!("{V3}/tasklists/{}/tasks.json", self.tasklist_id),
            "task",
            self,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Moves the task to another tasklist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasklist_id: Option<i64>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PATCH,
            server,
            &format!("{V3}/tasks/{}.json", self.id),
            "task",
            self,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Delete {
    pub id: i64,
}

impl Entity for Delete {
    fn build_request(&self, server: &Url) -> Result<Request> {
        bare(Method::DELETE, server, &format!("{V3}/tasks/{}.json", self.id))
    }
}
