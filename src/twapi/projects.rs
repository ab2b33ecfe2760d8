//! Projects. Reads go through v3; writes still use the legacy endpoints,
//! which answer creates with `{"id": "<n>", "STATUS": "OK"}`.

use chrono::NaiveDate;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Relationship, SearchFilters};
use crate::serde_utils::{compact_date, optional_comma_separated};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub company: Option<Relationship>,
    pub owner_id: Option<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tags: Vec<Relationship>,
    pub status: Option<String>,
    pub sub_status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_starred: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Project,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/projects/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "project")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Project;

    fn response(&self) -> &Project {
        &self.response
    }
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub filters: SearchFilters,
    pub response: Vec<Project>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &format!("{V3}/projects.json"), &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "projects")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Project;

    fn items(&self) -> &[Project] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

/// Writable fields in the legacy encoding: dates as `YYYYMMDD`,
/// tag ids as one comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "start-date",
        serialize_with = "compact_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_at: Option<NaiveDate>,
    #[serde(
        rename = "end-date",
        serialize_with = "compact_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_at: Option<NaiveDate>,
    #[serde(rename = "companyId", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(rename = "projectOwnerId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(
        rename = "tagIds",
        serialize_with = "optional_comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, "/projects.json", "project", self)
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
            &format!("/projects/{}.json", self.id),
            "project",
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
        bare(Method::DELETE, server, &format!("/projects/{}.json", self.id))
    }
}
