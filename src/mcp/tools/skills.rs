//! Skill tools and resources.

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
    Arguments, optional_numeric_list_param, optional_numeric_list_pointer_param,
    optional_pointer_param, required_numeric_param, required_param,
};
use crate::twapi::{Engine, skills};

const URI: &str = "twapi://skills";
const TEMPLATE: &str = "twapi://skills/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListSkillsParams {
    #[schemars(description = "Only skills whose name contains this text")]
    pub search_term: Option<String>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetSkillParams {
    #[schemars(description = "Skill ID")]
    pub skill_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateSkillParams {
    #[schemars(description = "Skill name")]
    pub name: String,
    #[schemars(description = "Users who have the skill")]
    pub user_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateSkillParams {
    #[schemars(description = "Skill ID to update")]
    pub skill_id: i64,
    #[schemars(description = "Skill name")]
    pub name: Option<String>,
    #[schemars(description = "Users who have the skill. Replaces the current users when provided.")]
    pub user_ids: Option<Vec<i64>>,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "skills", "First page of skills", |engine, ct| {
        read_page(engine, ct, skills::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "skill", "A single skill by id", |engine, id, ct| {
        let single = skills::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListSkillsParams>(
        "retrieve-skills",
        "List skills. Filter by search term; results are paginated.",
        retrieve_skills,
    )?;
    catalog.tool::<GetSkillParams>("retrieve-skill", "Get a skill by id.", retrieve_skill)?;
    catalog.tool::<CreateSkillParams>(
        "create-skill",
        "Create a skill and optionally assign it to users.",
        create_skill,
    )?;
    catalog.tool::<UpdateSkillParams>(
        "update-skill",
        "Rename a skill or replace the users who have it.",
        update_skill,
    )?;
    catalog.tool::<GetSkillParams>("delete-skill", "Delete a skill.", delete_skill)?;
    Ok(())
}

pub(super) fn bind_multiple(args: &Arguments) -> Result<skills::Multiple, McpError> {
    let mut multiple = skills::Multiple::default();
    let skills::Filters {
        search_term,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![optional_pointer_param(search_term, "search-term")];
    binders.extend(pagination_binders(pagination));
    bind(args, binders)?;
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<skills::Create, McpError> {
    let mut create = skills::Create::default();
    let skills::Create { name, user_ids } = &mut create;
    bind(
        args,
        [
            required_param(name, "name"),
            optional_numeric_list_param(user_ids, "user-ids"),
        ],
    )?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<skills::Update, McpError> {
    let mut update = skills::Update::default();
    let skills::Update { id, name, user_ids } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "skill-id"),
            optional_pointer_param(name, "name"),
            optional_numeric_list_pointer_param(user_ids, "user-ids"),
        ],
    )?;
    Ok(update)
}

async fn retrieve_skills(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args)?).await
}

async fn retrieve_skill(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = skills::Single {
        id: required_id(&args, "skill-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_skill(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Skill").await
}

async fn update_skill(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Skill updated successfully".to_string()).await
}

async fn delete_skill(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = skills::Delete {
        id: required_id(&args, "skill-id")?,
    };
    confirm(engine, ct, delete, "Skill deleted successfully".to_string()).await
}
