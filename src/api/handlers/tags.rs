//! Tag handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::{ErrorResponse, HandlerError, bad_request, internal_error, map_db_error, not_found};
use crate::api::AppState;
use crate::api::extract::{JsonBody, PathIds};
use crate::api::links::RequestHost;
use crate::db::{Database, Id, Tag, TagRepository, Todo};

// =============================================================================
// DTOs
// =============================================================================

/// Tag response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    #[schema(example = 3)]
    pub id: Id,
    #[schema(example = "errands")]
    pub title: String,
    /// Self-link
    #[schema(example = "http://localhost:8080/tags/3")]
    pub url: String,
}

impl TagResponse {
    pub fn new(tag: Tag, host: &RequestHost) -> Self {
        Self {
            url: host.tag_url(tag.id),
            id: tag.id,
            title: tag.title,
        }
    }
}

/// Todo as listed under a tag (no nested tags)
#[derive(Debug, Serialize, ToSchema)]
pub struct TaggedTodoResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Buy groceries")]
    pub title: String,
    #[schema(example = 0)]
    pub order: i64,
    #[schema(example = false)]
    pub completed: bool,
    #[schema(example = "http://localhost:8080/todos/1")]
    pub url: String,
}

impl TaggedTodoResponse {
    pub fn new(todo: Todo, host: &RequestHost) -> Self {
        Self {
            url: host.todo_url(todo.id),
            id: todo.id,
            title: todo.title,
            order: todo.order,
            completed: todo.completed,
        }
    }
}

/// Tag with the todos it is attached to
#[derive(Debug, Serialize, ToSchema)]
pub struct TagDetailResponse {
    #[schema(example = 3)]
    pub id: Id,
    #[schema(example = "errands")]
    pub title: String,
    #[schema(example = "http://localhost:8080/tags/3")]
    pub url: String,
    pub todos: Vec<TaggedTodoResponse>,
}

/// Create or rename tag request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct TagRequest {
    /// Tag title (required, non-empty)
    #[schema(example = "errands")]
    pub title: Option<String>,
}

impl TagRequest {
    fn required_title(self) -> Result<String, HandlerError> {
        self.title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| bad_request("\"title\" is a required field"))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all tags
#[utoipa::path(
    get,
    path = "/tags/",
    tag = "tags",
    responses(
        (status = 200, description = "List of tags", body = Vec<TagResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tags<D: Database>(
    State(state): State<AppState<D>>,
    host: RequestHost,
) -> Result<Json<Vec<TagResponse>>, HandlerError> {
    let tags = state.db().tags().list().await.map_err(internal_error)?;

    Ok(Json(
        tags.into_iter()
            .map(|tag| TagResponse::new(tag, &host))
            .collect(),
    ))
}

/// Delete all tags
#[utoipa::path(
    delete,
    path = "/tags/",
    tag = "tags",
    responses(
        (status = 204, description = "All tags deleted"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_all_tags<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<StatusCode, HandlerError> {
    state
        .db()
        .tags()
        .delete_all()
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create a new tag
#[utoipa::path(
    post,
    path = "/tags/",
    tag = "tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_tag<D: Database>(
    State(state): State<AppState<D>>,
    host: RequestHost,
    JsonBody(req): JsonBody<TagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), HandlerError> {
    let title = req.required_title()?;

    let tag = state
        .db()
        .tags()
        .create(&title)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(TagResponse::new(tag, &host))))
}

/// Get a tag with its todos
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag found", body = TagDetailResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tag<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
    host: RequestHost,
) -> Result<Json<TagDetailResponse>, HandlerError> {
    let id = id.ok_or_else(|| not_found("Tag not found"))?;

    let tag = state
        .db()
        .tags()
        .get(id)
        .await
        .map_err(map_db_error("Tag not found"))?;

    let todos = state
        .db()
        .tags()
        .get_todos(id)
        .await
        .map_err(internal_error)?;

    Ok(Json(TagDetailResponse {
        url: host.tag_url(tag.id),
        id: tag.id,
        title: tag.title,
        todos: todos
            .into_iter()
            .map(|todo| TaggedTodoResponse::new(todo, &host))
            .collect(),
    }))
}

/// Rename a tag
#[utoipa::path(
    patch,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_tag<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
    host: RequestHost,
    JsonBody(req): JsonBody<TagRequest>,
) -> Result<Json<TagResponse>, HandlerError> {
    let title = req.required_title()?;
    let id = id.ok_or_else(|| not_found("Tag not found"))?;

    let tag = state
        .db()
        .tags()
        .update(id, &title)
        .await
        .map_err(map_db_error("Tag not found"))?;

    Ok(Json(TagResponse::new(tag, &host)))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_tag<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
) -> Result<StatusCode, HandlerError> {
    let id = id.ok_or_else(|| not_found("Tag not found"))?;

    state
        .db()
        .tags()
        .delete(id)
        .await
        .map_err(map_db_error("Tag not found"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the todos a tag is attached to
#[utoipa::path(
    get,
    path = "/tags/{id}/todos",
    tag = "tags",
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Todos carrying the tag", body = Vec<TaggedTodoResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tag_todos<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
    host: RequestHost,
) -> Result<Json<Vec<TaggedTodoResponse>>, HandlerError> {
    let Some(id) = id else {
        return Ok(Json(Vec::new()));
    };

    let todos = state
        .db()
        .tags()
        .get_todos(id)
        .await
        .map_err(internal_error)?;

    Ok(Json(
        todos
            .into_iter()
            .map(|todo| TaggedTodoResponse::new(todo, &host))
            .collect(),
    ))
}
