//! Timelogs: time entries logged against a project or one of its tasks.

use chrono::{NaiveDate, NaiveTime};
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination, Relationship};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timelog {
    pub id: i64,
    pub description: Option<String>,
    pub billable: Option<bool>,
    pub minutes: Option<i64>,
    pub time_logged: Option<String>,
    pub user_id: Option<i64>,
    pub task_id: Option<i64>,
    pub project_id: Option<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tags: Vec<Relationship>,
    pub logged_by: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Timelog,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/time/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "timelog")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Timelog;

    fn response(&self) -> &Timelog {
        &self.response
    }
}

/// Scope of a timelog listing. A task wins over a project when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tag_ids: Vec<i64>,
    pub match_all_tags: Option<bool>,
    pub assigned_user_ids: Vec<i64>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: Filters,
    pub response: Vec<Timelog>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match (self.path.task_id, self.path.project_id) {
            (Some(task_id), _) => format!("{V3}/tasks/{task_id}/time.json"),
            (None, Some(project_id)) => format!("{V3}/projects/{project_id}/time.json"),
            (None, None) => format!("{V3}/time.json"),
        };
        let filters = &self.filters;
        let mut query = Query::default();
        query
            .date("startDate", filters.start_date)
            .date("endDate", filters.end_date)
            .list("tagIds", &filters.tag_ids)
            .flag("matchAllTags", filters.match_all_tags)
            .list("assignedToUserIds", &filters.assigned_user_ids);
        filters.pagination.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "timelogs")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Timelog;

    fn items(&self) -> &[Timelog] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

/// Where a new timelog is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Project(i64),
    Task(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    #[serde(skip)]
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(serialize_with = "clock::serialize")]
    pub time: NaiveTime,
    /// Whether `date`/`time` are UTC rather than the user's timezone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_utc: Option<bool>,
    pub hours: u32,
    pub minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    /// Log on behalf of another user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.target {
            Target::Project(project_id) => format!("{V3}/projects/{project_id}/time.json"),
            Target::Task(task_id) => format!("{V3}/tasks/{task_id}/time.json"),
        };
        write(Method::POST, server, &path, "timelog", self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(serialize_with = "clock_opt::serialize", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_utc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PATCH,
            server,
            &format!("{V3}/time/{}.json", self.id),
            "timelog",
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
        bare(Method::DELETE, server, &format!("{V3}/time/{}.json", self.id))
    }
}

/// `HH:MM:SS`, without the fractional seconds chrono would otherwise emit.
mod clock {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }
}

mod clock_opt {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => super::clock::serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }
}
