//! Types shared across entity families.

use serde::{Deserialize, Serialize};

/// Pagination block of v3 list responses (`meta.page`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    /// Zero-based page index.
    pub page_offset: u32,
    pub page_size: u32,
    /// Total number of matching items across all pages.
    pub count: u64,
    pub has_more: bool,
}

/// Foreign-key reference as returned by v3 endpoints, e.g.
/// `{"id": 7, "type": "tasklists"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Pagination inputs accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Pagination {
    pub(crate) fn apply(&self, query: &mut super::request::Query) {
        query
            .number("page", self.page)
            .number("pageSize", self.page_size);
    }
}

/// Filters shared by most v3 list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub search_term: Option<String>,
    pub tag_ids: Vec<i64>,
    /// Require every tag in `tag_ids` rather than any of them.
    pub match_all_tags: Option<bool>,
    pub pagination: Pagination,
}

impl SearchFilters {
    pub(crate) fn apply(&self, query: &mut super::request::Query) {
        query
            .string("searchTerm", self.search_term.as_deref())
            .list("tagIds", &self.tag_ids)
            .flag("matchAllTags", self.match_all_tags);
        self.pagination.apply(query);
    }
}

/// Users, companies and teams responsible for an item, in the v3 encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGroups {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub company_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<i64>,
}

impl UserGroups {
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.company_ids.is_empty() && self.team_ids.is_empty()
    }
}

/// The legacy (v1) encoding of [`UserGroups`]: one comma-separated string
/// where companies carry a `c` prefix and teams a `t` prefix, e.g.
/// `"1,2,c3,t4"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyUserGroups(pub UserGroups);

impl Serialize for LegacyUserGroups {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let groups = &self.0;
        let encoded = groups
            .user_ids
            .iter()
            .map(|id| id.to_string())
            .chain(groups.company_ids.iter().map(|id| format!("c{id}")))
            .chain(groups.team_ids.iter().map(|id| format!("t{id}")))
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&encoded)
    }
}
