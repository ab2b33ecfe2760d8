//! Comment tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, bind, confirm, create, fetch_one, fetch_page, map_error, read_one,
    read_page, required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, BindError, bind_group, optional_pointer_param, required_numeric_param,
    required_object_param, required_param,
};
use crate::twapi::comments::{self, CONTENT_TYPES, OBJECT_TYPES, Object, ObjectType};
use crate::twapi::Engine;

const URI: &str = "twapi://comments";
const TEMPLATE: &str = "twapi://comments/{id}";

/// The item a comment is attached to.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[schemars(inline)]
pub struct CommentObjectParams {
    #[serde(rename = "type")]
    #[schemars(description = "Kind of item", extend("enum" = OBJECT_TYPES))]
    pub kind: String,
    #[schemars(description = "Id of the item")]
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListCommentsParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListObjectCommentsParams {
    #[schemars(description = "The commented item")]
    pub object: CommentObjectParams,
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetCommentParams {
    #[schemars(description = "Comment ID")]
    pub comment_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CreateCommentParams {
    #[schemars(description = "The commented item")]
    pub object: CommentObjectParams,
    #[schemars(description = "Comment text")]
    pub body: String,
    #[schemars(description = "Format of the body", extend("enum" = CONTENT_TYPES))]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateCommentParams {
    #[schemars(description = "Comment ID to update")]
    pub comment_id: i64,
    #[schemars(description = "Comment text")]
    pub body: Option<String>,
    #[schemars(description = "Format of the body", extend("enum" = CONTENT_TYPES))]
    pub content_type: Option<String>,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "comments", "First page of comments across the site", |engine, ct| {
        read_page(engine, ct, comments::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "comment", "A single comment by id", |engine, id, ct| {
        let single = comments::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListCommentsParams>(
        "retrieve-comments",
        "List comments across the site. Filter by search term; results are paginated.",
        retrieve_comments,
    )?;
    catalog.tool::<ListObjectCommentsParams>(
        "retrieve-object-comments",
        "List the comments left on one task, milestone, file, notebook or link.",
        retrieve_object_comments,
    )?;
    catalog.tool::<GetCommentParams>(
        "retrieve-comment",
        "Get a comment by id.",
        retrieve_comment,
    )?;
    catalog.tool::<CreateCommentParams>(
        "create-comment",
        "Comment on a task, milestone, file, notebook or link.",
        create_comment,
    )?;
    catalog.tool::<UpdateCommentParams>(
        "update-comment",
        "Edit a comment. Only the given fields change.",
        update_comment,
    )?;
    catalog.tool::<GetCommentParams>("delete-comment", "Delete a comment.", delete_comment)?;
    Ok(())
}

#[derive(Debug, Default)]
struct ObjectArgs {
    kind: String,
    id: i64,
}

fn bind_object_args(args: &Arguments, object: &mut ObjectArgs) -> Result<(), BindError> {
    let ObjectArgs { kind, id } = object;
    bind_group(
        args,
        [
            required_param(kind, "type").restrict(OBJECT_TYPES),
            required_numeric_param(id, "id"),
        ],
    )
}

fn to_object(object: ObjectArgs) -> Result<Object, McpError> {
    let kind: ObjectType = object.kind.parse().map_err(map_error)?;
    Ok(Object {
        kind,
        id: object.id,
    })
}

pub(super) fn bind_multiple(
    args: &Arguments,
    scoped: bool,
) -> Result<comments::Multiple, McpError> {
    let mut multiple = comments::Multiple::default();
    let mut object = ObjectArgs::default();
    let mut binders = search_binders(&mut multiple.filters);
    if scoped {
        binders.push(required_object_param(&mut object, "object", bind_object_args));
    }
    bind(args, binders)?;
    if scoped {
        multiple.path.object = Some(to_object(object)?);
    }
    Ok(multiple)
}

pub(super) fn bind_create(args: &Arguments) -> Result<comments::Create, McpError> {
    let mut object = ObjectArgs::default();
    let mut body = String::new();
    let mut content_type = None;
    bind(
        args,
        [
            required_object_param(&mut object, "object", bind_object_args),
            required_param(&mut body, "body"),
            optional_pointer_param(&mut content_type, "content-type").restrict(CONTENT_TYPES),
        ],
    )?;
    Ok(comments::Create {
        object: to_object(object)?,
        body,
        content_type,
    })
}

pub(super) fn bind_update(args: &Arguments) -> Result<comments::Update, McpError> {
    let mut update = comments::Update::default();
    let comments::Update {
        id,
        body,
        content_type,
    } = &mut update;
    bind(
        args,
        [
            required_numeric_param(id, "comment-id"),
            optional_pointer_param(body, "body"),
            optional_pointer_param(content_type, "content-type").restrict(CONTENT_TYPES),
        ],
    )?;
    Ok(update)
}

async fn retrieve_comments(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, false)?).await
}

async fn retrieve_object_comments(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, bind_multiple(&args, true)?).await
}

async fn retrieve_comment(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = comments::Single {
        id: required_id(&args, "comment-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_comment(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Comment").await
}

async fn update_comment(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Comment updated successfully".to_string()).await
}

async fn delete_comment(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = comments::Delete {
        id: required_id(&args, "comment-id")?,
    };
    confirm(engine, ct, delete, "Comment deleted successfully".to_string()).await
}
