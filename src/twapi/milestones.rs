//! Milestones: project deadlines that tasklists can be attached to.

use chrono::NaiveDate;
use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{LegacyUserGroups, PageMeta, Relationship, SearchFilters};
use crate::serde_utils::{comma_separated_ids, compact_date, optional_comma_separated};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub completed: Option<bool>,
    pub project_id: Option<i64>,
    /// Sent as `"1,2"` by some endpoints and as an array by others.
    #[serde(deserialize_with = "comma_separated_ids")]
    pub responsible_party_ids: Vec<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tasklist_ids: Vec<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tags: Vec<Relationship>,
    pub status: Option<String>,
    pub created_on: Option<String>,
    pub last_changed_on: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Milestone,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/milestones/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "milestone")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Milestone;

    fn response(&self) -> &Milestone {
        &self.response
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: SearchFilters,
    pub response: Vec<Milestone>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.project_id {
            Some(project_id) => format!("{V3}/projects/{project_id}/milestones.json"),
            None => format!("{V3}/milestones.json"),
        };
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "milestones")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Milestone;

    fn items(&self) -> &[Milestone] {
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
    #[serde(
        serialize_with = "compact_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(
        rename = "responsible-party-ids",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignees: Option<LegacyUserGroups>,
    #[serde(
        rename = "tasklistIds",
        serialize_with = "optional_comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub tasklist_ids: Option<Vec<i64>>,
    #[serde(
        rename = "tagIds",
        serialize_with = "optional_comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    #[serde(skip)]
    pub project_id: i64,
    #[serde(rename = "title")]
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::POST,
            server,
            &format!("/projects/{}/milestones.json", self.project_id),
            "milestone",
            self,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "title", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PUT,
            server,
            &format!("/milestones/{}.json", self.id),
            "milestone",
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
        bare(Method::DELETE, server, &format!("/milestones/{}.json", self.id))
    }
}
