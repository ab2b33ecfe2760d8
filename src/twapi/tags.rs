//! Tags: short labels attached to projects, tasks, milestones and other items.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Pagination};

/// Upper bound the upstream enforces on tag names.
pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    /// Set for project-scoped tags, absent for site-wide ones.
    pub project_id: Option<i64>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Tag,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/tags/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "tag")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Tag;

    fn response(&self) -> &Tag {
        &self.response
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search_term: Option<String>,
    /// Only tags usable on this kind of item, e.g. `task` or `project`.
    pub item_type: Option<String>,
    pub project_ids: Vec<i64>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub filters: Filters,
    pub response: Vec<Tag>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let mut query = Query::default();
        query
            .string("searchTerm", self.filters.search_term.as_deref())
            .string("itemType", self.filters.item_type.as_deref())
            .list("projectIds", &self.filters.project_ids);
        self.filters.pagination.apply(&mut query);
        get(server, &format!("{V3}/tags.json"), &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "tags")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Tag;

    fn items(&self) -> &[Tag] {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(Method::POST, server, &format!("{V3}/tags.json"), "tag", self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PATCH,
            server,
            &format!("{V3}/tags/{}.json", self.id),
            "tag",
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
        bare(Method::DELETE, server, &format!("{V3}/tags/{}.json", self.id))
    }
}
