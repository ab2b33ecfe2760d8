//! Industries: the fixed catalog companies can be classified under. Read-only.

use reqwest::{Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse};
use super::error::Result;
use super::request::{Query, V3, decode_list, get};
use super::types::PageMeta;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Industry {
    pub id: i64,
    pub name: String,
}

/// The whole catalog; the endpoint takes no filters and does not paginate.
#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub response: Vec<Industry>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/industries.json"), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "industries")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Industry;

    fn items(&self) -> &[Industry] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}
