//! Users (people): site members, collaborators and contacts.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination, Relationship};

pub const USER_TYPES: &[&str] = &["account", "collaborator", "contact"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_admin: Option<bool>,
    pub company_id: Option<i64>,
    pub company: Option<Relationship>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub job_roles: Vec<Relationship>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub skills: Vec<Relationship>,
    pub deleted: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: User,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/people/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "person")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = User;

    fn response(&self) -> &User {
        &self.response
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search_term: Option<String>,
    /// Restrict to `account`, `collaborator` or `contact`.
    pub kind: Option<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: Filters,
    pub response: Vec<User>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.project_id {
            Some(project_id) => format!("{V3}/projects/{project_id}/people.json"),
            None => format!("{V3}/people.json"),
        };
        let mut query = Query::default();
        query
            .string("searchTerm", self.filters.search_term.as_deref())
            .string("type", self.filters.kind.as_deref());
        self.filters.pagination.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "people")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = User;

    fn items(&self) -> &[User] {
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
    pub title: Option<String>,
    #[serde(rename = "administrator", skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(rename = "user-type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "company-id", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    #[serde(rename = "first-name")]
    pub first_name: String,
    #[serde(rename = "last-name")]
    pub last_name: String,
    #[serde(rename = "email-address")]
    pub email: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, "/people.json", "person", self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "first-name", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "last-name", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "email-address", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PUT,
            server,
            &format!("/people/{}.json", self.id),
            "person",
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
        bare(Method::DELETE, server, &format!("/people/{}.json", self.id))
    }
}
