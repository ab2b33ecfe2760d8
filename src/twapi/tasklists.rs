//! Tasklists: ordered groups of tasks inside a project.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, SearchFilters};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tasklist {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<i64>,
    pub milestone_id: Option<i64>,
    pub status: Option<String>,
    pub display_order: Option<i64>,
    pub is_private: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Tasklist,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/tasklists/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "tasklist")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Tasklist;

    fn response(&self) -> &Tasklist {
        &self.response
    }
}

/// Narrows the listing to one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: SearchFilters,
    pub response: Vec<Tasklist>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.project_id {
            Some(project_id) => format!("{V3}/projects/{project_id}/tasklists.json"),
            None => format!("{V3}/tasklists.json"),
        };
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "tasklists")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Tasklist;

    fn items(&self) -> &[Tasklist] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

/// Legacy body fields, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "milestone-Id", skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

/// Legacy endpoints wrap tasklist bodies in `todo-list`.
const ENVELOPE: &str = "todo-list";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    #[serde(skip)]
    pub project_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::POST,
            server,
            &format!("/projects/{}/tasklists.json", self.project_id),
            ENVELOPE,
            self,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PUT,
            server,
            &format!("/tasklists/{}.json", self.id),
            ENVELOPE,
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
        bare(Method::DELETE, server, &format!("/tasklists/{}.json", self.id))
    }
}
