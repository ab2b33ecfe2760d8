//! Job roles: named roles users hold across projects.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination, Relationship};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRole {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub users: Vec<Relationship>,
    pub is_active: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: JobRole,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/jobroles/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "jobRole")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = JobRole;

    fn response(&self) -> &JobRole {
        &self.response
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search_term: Option<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub filters: Filters,
    pub response: Vec<JobRole>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let mut query = Query::default();
        query.string("searchTerm", self.filters.search_term.as_deref());
        self.filters.pagination.apply(&mut query);
        get(server, &format!("{V3}/jobroles.json"), &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "jobRoles")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = JobRole;

    fn items(&self) -> &[JobRole] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    pub name: String,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, &format!("{V3}/jobroles.json"), "jobRole", self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PATCH,
            server,
            &format!("{V3}/jobroles/{}.json", self.id),
            "jobRole",
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
        bare(Method::DELETE, server, &format!("{V3}/jobroles/{}.json", self.id))
    }
}
