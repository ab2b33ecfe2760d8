//! Typed client for the Teamwork REST API.
//!
//! Every remote operation is an [`Entity`]: a value that knows how to build
//! its request and how to absorb the response. The [`Engine`] executes any
//! entity with shared transport and credentials.
//!
//! One sub-module per resource family. Each exposes the same shapes:
//!
//! - `Single`: GET one resource by id
//! - `Multiple`: GET a page of resources, scoped by `Path`, narrowed by `Filters`
//! - `Create`, `Update`, `Delete`: writes (where the upstream allows them)

mod engine;
mod error;
mod request;
pub mod types;

pub mod activities;
pub mod comments;
pub mod companies;
pub mod industries;
pub mod jobroles;
pub mod milestones;
pub mod projects;
pub mod skills;
pub mod tags;
pub mod tasklists;
pub mod tasks;
pub mod teams;
pub mod timelogs;
pub mod timers;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;


pub use engine::{
    Engine, Entity, ExecuteOption, ListResponse, MAX_BODY_BYTES, SingleResponse, with_id_callback,
    with_span,
};
pub use error::{Error, ErrorKind, Result};
pub use types::{LegacyUserGroups, PageMeta, Pagination, Relationship, SearchFilters, UserGroups};
