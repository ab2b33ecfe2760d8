//! Timers: running stopwatches owned by the authenticated user. Completing a
//! timer turns it into a timelog.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timer {
    pub id: i64,
    pub description: Option<String>,
    pub running: bool,
    pub billable: bool,
    /// Accumulated seconds, excluding the current run.
    pub duration: Option<i64>,
    pub user_id: Option<i64>,
    pub task_id: Option<i64>,
    pub project_id: Option<i64>,
    pub timelog_id: Option<i64>,
    pub last_started_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Timer,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/timers/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "timer")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Timer;

    fn response(&self) -> &Timer {
        &self.response
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub user_id: Option<i64>,
    pub task_id: Option<i64>,
    pub project_id: Option<i64>,
    pub running_timers_only: Option<bool>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub filters: Filters,
    pub response: Vec<Timer>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let filters = &self.filters;
        let mut query = Query::default();
        query
            .number("userId", filters.user_id)
            .number("taskId", filters.task_id)
            .number("projectId", filters.project_id)
            .flag("runningTimersOnly", filters.running_timers_only);
        filters.pagination.apply(&mut query);
        get(server, &format!("{V3}/timers.json"), &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "timers")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Timer;

    fn items(&self) -> &[Timer] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    /// Start immediately instead of creating the timer paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Pause any other running timer of the user first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_running_timers: Option<bool>,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, &format!("{V3}/me/timers.json"), "timer", self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PUT,
            server,
            &format!("{V3}/me/timers/{}.json", self.id),
            "timer",
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
        bare(Method::DELETE, server, &format!("{V3}/me/timers/{}.json", self.id))
    }
}

fn verb(server: &Url, id: i64, verb: &str) -> Result<Request> {
    bare(Method::POST, server, &format!("{V3}/me/timers/{id}/{verb}.json"))
}

/// Stop the clock, keeping the accumulated duration.
#[derive(Debug, Clone, Default)]
pub struct Pause {
    pub id: i64,
}

impl Entity for Pause {
    fn build_request(&self, server: &Url) -> Result<Request> {
        verb(server, self.id, "pause")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resume {
    pub id: i64,
}

impl Entity for Resume {
    fn build_request(&self, server: &Url) -> Result<Request> {
        verb(server, self.id, "resume")
    }
}

/// Stop the timer for good and log its duration as time.
#[derive(Debug, Clone, Default)]
pub struct Complete {
    pub id: i64,
}

impl Entity for Complete {
    fn build_request(&self, server: &Url) -> Result<Request> {
        verb(server, self.id, "complete")
    }
}
