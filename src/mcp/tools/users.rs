//! User (people) tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, PageParams, bind, confirm, create, fetch_one, fetch_page, pagination_binders,
    read_one, read_page, required_id,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_numeric_pointer_param, optional_pointer_param,
    required_numeric_param, required_param,
};
use crate::twapi::users::{self, USER_TYPES};
use crate::twapi::Engine;

const URI: &str = "twapi://users";
const TEMPLATE: &str = "twapi://users/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UserFilterParams {
    #[schemars(description = "Only users whose name or email contains this text")]
    pub search_term: Option<String>,
    #[serde(rename = "type")]
    #[schemars(description = "Only users of this type", extend("enum" = USER_TYPES))]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListUsersParams {
    #[serde(flatten)]
    pub filters: UserFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectUsersParams {
    #[schemars(description = "Project whose users to list")]
    pub project_id: i64,
    #[serde(flatten)]
    pub filters: UserFilterParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetUserParams {
    #[schemars(description = "User ID")]
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UserFieldParams {
    #[schemars(description = "Job title")]
    pub title: Option<String>,
    #[schemars(description = "Whether the user administers the site")]
    pub admin: Option<bool>,
    #[serde(rename = "type")]
    #[schemars(description = "User type", extend("enum" = USER_TYPES))]
    pub kind: Option<String>,
    #[schemars(description = "Company the user belongs to")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateUserParams {
    #[schemars(description = "First name")]
    pub first_name: String,
    #[schemars(description = "Last name")]
    pub last_name: String,
    #[schemars(description = "Email address")]
    pub email: String,
    #[serde(flatten)]
    pub fields: UserFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateUserParams {
    #[schemars(description = "User ID to update")]
    pub user_id: i64,
    #[schemars(description = "First name")]
    pub first_name: Option<String>,
    #[schemars(description = "Last name")]
    pub last_name: Option<String>,
    #[schemars(description = "Email address")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: UserFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "users", "First page of users", |engine, ct| {
        read_page(engine, ct, users::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "user", "A single user by id", |engine, id, ct| {
        let single = users::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListUsersParams>(
        "retrieve-users",
        "List users. Filter by search term or user type; results are paginated.",
        retrieve_users,
    )?;
    catalog.tool::<ListProjectUsersParams>(
        "retrieve-project-users",
        "List the users of one project. Filter by search term or user type; results are paginated.",
        retrieve_project_users,
    )?;
    catalog.tool::<GetUserParams>("retrieve-user", "Get a user by id.", retrieve_user)?;
    catalog.tool::<CreateUserParams>("create-user", "Invite a user to the site.", create_user)?;
    catalog.tool::<UpdateUserParams>(
        "update-user",
        "Update a user. Only the given fields change.",
        update_user,
    )?;
    catalog.tool::<GetUserParams>("delete-user", "Delete a user.", delete_user)?;
    Ok(())
}

fn field_binders(fields: &mut users::Fields) -> Vec<Binder<'_>> {
    let users::Fields {
        title,
        admin,
        kind,
        company_id,
    } = fields;
    vec![
        optional_pointer_param(title, "title"),
        optional_pointer_param(admin, "admin"),
        optional_pointer_param(kind, "type").restrict(USER_TYPES),
        optional_numeric_pointer_param(company_id, "company-id"),
    ]
}

pub(super) fn bind_multiple(args: &Arguments, scoped: bool) -> Result<users::Multiple, McpError> {
    let mut multiple = users::Multiple::default();
    let mut project_id: i64 = 0;
    let users::Filters {
        search_term,
        kind,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![
        optional_pointer_param(search_term, "search-term"),
        optional_pointer_param(kind, "type").restrict(USER_TYPES),
    ];
    binders.extend(pagination_binders(pagination));
    if scoped {
        binders.push(required_numeric_param(&mut project_id, "project-id"));
    }
    bind(args, binders)?;
    if scoped {
        multiple.path.project_id = Some(project_id);
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<users::Create, McpError> {
    let mut create = users::Create::default();
    let users::Create {
        first_name,
        last_name,
        email,
        fields,
    } = &mut create;
    let mut binders = vec![
        required_param(first_name, "first-name"),
        required_param(last_name, "last-name"),
        required_param(email, "email"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<users::Update, McpError> {
    let mut update = users::Update::default();
    let users::Update {
        id,
        first_name,
        last_name,
        email,
        fields,
    } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "user-id"),
        optional_pointer_param(first_name, "first-name"),
        optional_pointer_param(last_name, "last-name"),
        optional_pointer_param(email, "email"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(update)
}

async fn retrieve_users(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_project_users(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}

async fn retrieve_user(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = users::Single {
        id: required_id(&args, "user-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_user(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "User").await
}

async fn update_user(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "User updated successfully".to_string()).await
}

async fn delete_user(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = users::Delete {
        id: required_id(&args, "user-id")?,
    };
    confirm(engine, ct, delete, "User deleted successfully".to_string()).await
}
