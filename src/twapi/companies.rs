//! Companies (clients): organisations users and projects belong to.

use reqwest::{Method, Request, Url};
use serde::{Deserialize, Serialize};

use super::engine::{Entity, ListResponse, SingleResponse};
use super::error::Result;
use super::request::{Query, V3, bare, decode_list, decode_single, get, write};
use super::types::{PageMeta, Relationship, SearchFilters};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub address_one: Option<String>,
    pub address_two: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email_one: Option<String>,
    pub email_two: Option<String>,
    pub email_three: Option<String>,
    pub website: Option<String>,
    pub profile_text: Option<String>,
    pub manager_id: Option<i64>,
    pub industry_id: Option<i64>,
    #[serde(deserialize_with = "crate::serde_utils::null_as_default")]
    pub tags: Vec<Relationship>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Single {
    pub id: i64,
    pub response: Company,
}

impl Entity for Single {
    fn build_request(&self, server: &Url) -> Result<Request> {
        get(server, &format!("{V3}/companies/{}.json", self.id), &Query::default())
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        self.response = decode_single(body, "company")?;
        Ok(())
    }
}

impl SingleResponse for Single {
    type Output = Company;

    fn response(&self) -> &Company {
        &self.response
    }
}

#[derive(Debug, Clone, Default)]
pub struct Multiple {
    pub filters: SearchFilters,
    pub response: Vec<Company>,
    pub meta: Option<PageMeta>,
}

impl Entity for Multiple {
    fn build_request(&self, server: &Url) -> Result<Request> {
        let mut query = Query::default();
        self.filters.apply(&mut query);
        get(server, &format!("{V3}/companies.json"), &query)
    }

    fn decode_response(&mut self, body: &[u8]) -> Result<()> {
        (self.response, self.meta) = decode_list(body, "companies")?;
        Ok(())
    }
}

impl ListResponse for Multiple {
    type Item = Company;

    fn items(&self) -> &[Company] {
        &self.response
    }

    fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }
}

/// Writable company fields. Shared by create (with `name` required by the
/// caller) and update (everything optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(rename = "countrycode", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_three: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "profile", skip_serializing_if = "Option::is_none")]
    pub profile_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
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
        write(Method::POST, server, &format!("{V3}/companies.json"), "company", self)
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
            Method::PATCH,
            server,
            &format!("{V3}/companies/{}.json", self.id),
            "company",
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
        bare(Method::DELETE, server, &format!("{V3}/companies/{}.json", self.id))
    }
}
