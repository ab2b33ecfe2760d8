//! Teams. Served only by the legacy endpoints, which send ids either as
//! numbers or as strings holding numbers, hence [`LegacyNumber`].

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination};
use crate::serde_utils::{LegacyNumber, comma_separated};

/// A team reference nested in another team (parent, root).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRef {
    pub id: LegacyNumber,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub id: LegacyNumber,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: LegacyNumber,
    pub name: String,
    pub handle: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "parentTeam")]
    pub parent_team: Option<TeamRef>,
    #[serde(rename = "rootTeam")]
    pub root_team: Option<TeamRef>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub members: Vec<Member>,
    #[serde(rename = "teamLogo")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Team,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("/teams/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "team")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Team;

    fn response(&self) -> &Team {
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
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: Filters,
    pub response: Vec<Team>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.project_id {
            Some(project_id) => format!("/projects/{project_id}/teams.json"),
            None => "/teams.json".to_string(),
        };
        let mut query = Query::default();
        query.string("searchTerm", self.filters.search_term.as_deref());
        self.filters.pagination.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "teams")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Team;

    fn items(&self) -> &[Team] {
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
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_team_id: Option<LegacyNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<LegacyNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<LegacyNumber>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Create {
    pub name: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, "/teams.json", "team", self)
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
            &format!("/teams/{}.json", self.id),
            "team",
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
        bare(Method::DELETE, server, &format!("/teams/{}.json", self.id))
    }
}
