//! Comments left on tasks, milestones, files, notebooks and links.

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::{Error, Result};
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Relationship, SearchFilters};

pub const OBJECT_TYPES: &[&str] = &["tasks", "milestones", "files", "notebooks", "links"];
pub const CONTENT_TYPES: &[&str] = &["TEXT", "HTML"];

/// Kind of item a comment hangs off. Renders as its URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Tasks,
    Milestones,
    Files,
    Notebooks,
    Links,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Tasks => "tasks",
            ObjectType::Milestones => "milestones",
            ObjectType::Files => "files",
            ObjectType::Notebooks => "notebooks",
            ObjectType::Links => "links",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tasks" => Ok(ObjectType::Tasks),
            "milestones" => Ok(ObjectType::Milestones),
            "files" => Ok(ObjectType::Files),
            "notebooks" => Ok(ObjectType::Notebooks),
            "links" => Ok(ObjectType::Links),
            other => Err(Error::invalid(format!("unknown comment object type \"{other}\""))),
        }
    }
}

/// The item a comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjectType,
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub html_body: Option<String>,
    pub content_type: Option<String>,
    pub object: Option<Relationship>,
    pub project_id: Option<i64>,
    pub posted_by: Option<i64>,
    pub posted_at: Option<String>,
    pub last_edited_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Comment,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/comments/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "comment")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Comment;

    fn response(&self) -> &Comment {
        &self.response
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path {
    /// List the comments of one item instead of the whole site.
    pub object: Option<Object>,
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub path: Path,
    pub filters: SearchFilters,
    pub response: Vec<Comment>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let path = match self.path.object {
            Some(Object { kind, id }) => format!("{V3}/{kind}/{id}/comments.json"),
            None => format!("{V3}/comments.json"),
        };
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &path, &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "comments")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Comment;

    fn items(&self) -> &[Comment] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Create {
    #[serde(skip)]
    pub object: Object,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Entity for Create {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let Object { kind, id } = self.object;
        write(
            Method::POST,
            server,
            &format!("/{kind}/{id}/comments.json"),
            "comment",
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
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Entity for Update {
    fn build_request(&self, server: &Url) -> Result<Request> {
        write(
            Method::PUT,
            server,
            &format!("/comments/{}.json", self.id),
            "comment",
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
        bare(Method::DELETE, server, &format!("/comments/{}.json", self.id))
    }
}
