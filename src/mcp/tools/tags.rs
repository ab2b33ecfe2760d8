//! Tag tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, PageParams, bind, confirm, create, fetch_one, fetch_page, field_error,
    pagination_binders, read_one, read_page, required_id,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, optional_numeric_list_param, optional_numeric_pointer_param,
    optional_pointer_param, required_numeric_param, required_param,
};
use crate::twapi::tags::{self, MAX_NAME_LEN};
use crate::twapi::Engine;

const URI: &str = "twapi://tags";
const TEMPLATE: &str = "twapi://tags/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct ListTagsParams {
    #[schemars(description = "Only tags whose name contains this text")]
    pub search_term: Option<String>,
    #[schemars(description = "Only tags used on this kind of item, e.g. project or task")]
    pub item_type: Option<String>,
    #[schemars(description = "Only tags scoped to these projects")]
    pub project_ids: Option<Vec<i64>>,
    #[serde(flatten)]
    pub pagination: PageParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetTagParams {
    #[schemars(description = "Tag ID")]
    pub tag_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateTagParams {
    #[schemars(description = "Tag name", length(max = MAX_NAME_LEN))]
    pub name: String,
    #[schemars(description = "Project the tag is scoped to")]
    pub project_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateTagParams {
    #[schemars(description = "Tag ID to update")]
    pub tag_id: i64,
    #[schemars(description = "Tag name", length(max = MAX_NAME_LEN))]
    pub name: Option<String>,
    #[schemars(description = "Project the tag is scoped to")]
    pub project_id: Option<i64>,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "tags", "First page of tags", |engine, ct| {
        read_page(engine, ct, tags::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "tag", "A single tag by id", |engine, id, ct| {
        let single = tags::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListTagsParams>(
        "retrieve-tags",
        "List tags. Filter by search term, item type or project; results are paginated.",
        retrieve_tags,
    )?;
    catalog.tool::<GetTagParams>("retrieve-tag", "Get a tag by id.", retrieve_tag)?;
    catalog.tool::<CreateTagParams>(
        "create-tag",
        "Create a tag, site-wide or scoped to one project.",
        create_tag,
    )?;
    catalog.tool::<UpdateTagParams>(
        "update-tag",
        "Rename a tag or change its project.",
        update_tag,
    )?;
    catalog.tool::<GetTagParams>(
        "delete-tag",
        "Delete a tag and remove it from every item.",
        delete_tag,
    )?;
    Ok(())
}

fn check_name(name: &str) -> Result<(), McpError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(field_error(
            "name",
            &format!("must have at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

pub(super) fn bind_multiple(args: &Arguments) -> Result<tags::Multiple, McpError> {
    let mut multiple = tags::Multiple::default();
    let tags::Filters {
        search_term,
        item_type,
        project_ids,
        pagination,
    } = &mut multiple.filters;
    let mut binders = vec![
        optional_pointer_param(search_term, "search-term"),
        optional_pointer_param(item_type, "item-type"),
        optional_numeric_list_param(project_ids, "project-ids"),
    ];
    binders.extend(pagination_binders(pagination));
    bind(args, binders)?;
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<tags::Create, McpError> {
    let mut create = tags::Create::default();
    let tags::Create { name, project_id } = &mut create;
    bind(
        args,
        [
            required_param(name, "name"),
            optional_numeric_pointer_param(project_id, "project-id"),
        ],
    )?;
    check_name(&create.name)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<tags::Update, McpError> {
    let mut update = tags::Update::default();
    let tags::Update {
        id,
        name,
        project_id,
    } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "tag-id"),
            optional_pointer_param(name, "name"),
            optional_numeric_pointer_param(project_id, "project-id"),
        ],
    )?;
    if let Some(name) = &update.name {
        check_name(name)?;
    }
    Ok(update)
}

async fn retrieve_tags(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args)?).await
}

async fn retrieve_tag(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = tags::Single {
        id: required_id(&args, "tag-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_tag(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Tag").await
}

async fn update_tag(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Tag updated successfully".to_string()).await
}

async fn delete_tag(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = tags::Delete {
        id: required_id(&args, "tag-id")?,
    };
    confirm(engine, ct, delete, "Tag deleted successfully".to_string()).await
}
