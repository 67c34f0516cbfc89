//! Todo handlers, including the todo side of tag associations.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

use super::{
    ErrorResponse, HandlerError, TagResponse, bad_request, internal_error, map_db_error, not_found,
};
use crate::api::AppState;
use crate::api::extract::{JsonBody, PathIds};
use crate::api::links::RequestHost;
use crate::db::{Database, DbError, Id, NewTodo, Todo, TodoPatch, TodoRepository};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Todo response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Buy groceries")]
    pub title: String,
    /// Sort hint supplied by the client
    #[schema(example = 0)]
    pub order: i64,
    #[schema(example = false)]
    pub completed: bool,
    /// Self-link
    #[schema(example = "http://localhost:8080/todos/1")]
    pub url: String,
    /// Tags currently attached to the todo
    pub tags: Vec<TagResponse>,
}

impl TodoResponse {
    pub fn new(todo: Todo, host: &RequestHost) -> Self {
        Self {
            url: host.todo_url(todo.id),
            id: todo.id,
            title: todo.title,
            order: todo.order,
            completed: todo.completed,
            tags: todo
                .tags
                .into_iter()
                .map(|tag| TagResponse::new(tag, host))
                .collect(),
        }
    }
}

/// Create todo request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Todo title (required, non-empty)
    #[schema(example = "Buy groceries")]
    pub title: Option<String>,
    /// Sort hint, defaults to 0
    #[schema(example = 0)]
    pub order: Option<i64>,
}

/// Patch todo request DTO (partial update)
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchTodoRequest {
    #[schema(example = "Buy more groceries")]
    pub title: Option<String>,
    #[schema(example = 2)]
    pub order: Option<i64>,
    #[schema(example = true)]
    pub completed: Option<bool>,
}

impl From<PatchTodoRequest> for TodoPatch {
    fn from(req: PatchTodoRequest) -> Self {
        Self {
            title: req.title,
            order: req.order,
            completed: req.completed,
        }
    }
}

/// Associate tag request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddTagRequest {
    /// ID of the tag to attach
    #[schema(example = 3)]
    pub id: Option<Id>,
}

/// Association response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct AssociationResponse {
    #[schema(example = 1)]
    pub todo_id: Id,
    #[schema(example = 3)]
    pub tag_id: Id,
}

// =============================================================================
// Handlers
// =============================================================================

const ASSOCIATION_NOT_CREATED: &str =
    "Association not created. Check if both todo and tag exist.";

/// List all todos with their tags
#[utoipa::path(
    get,
    path = "/todos",
    tag = "todos",
    responses(
        (status = 200, description = "List of todos", body = Vec<TodoResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todos<D: Database>(
    State(state): State<AppState<D>>,
    host: RequestHost,
) -> Result<Json<Vec<TodoResponse>>, HandlerError> {
    let todos = state.db().todos().list().await.map_err(internal_error)?;

    Ok(Json(
        todos
            .into_iter()
            .map(|todo| TodoResponse::new(todo, &host))
            .collect(),
    ))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todo<D: Database>(
    State(state): State<AppState<D>>,
    host: RequestHost,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), HandlerError> {
    let title = req
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| bad_request("Title is required"))?;

    let todo = state
        .db()
        .todos()
        .create(&NewTodo {
            title,
            order: req.order.unwrap_or(0),
        })
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(TodoResponse::new(todo, &host))))
}

/// Delete all todos
#[utoipa::path(
    delete,
    path = "/todos/",
    tag = "todos",
    responses(
        (status = 204, description = "All todos deleted"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_all_todos<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<StatusCode, HandlerError> {
    state
        .db()
        .todos()
        .delete_all()
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
    host: RequestHost,
) -> Result<Json<TodoResponse>, HandlerError> {
    let id = id.ok_or_else(|| not_found("Todo not found"))?;

    let todo = state
        .db()
        .todos()
        .get(id)
        .await
        .map_err(map_db_error("Todo not found"))?;

    Ok(Json(TodoResponse::new(todo, &host)))
}

/// Partially update a todo
///
/// Only supplied fields are written. The returned todo always has an empty
/// `tags` list; fetch the todo again to see its tags.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = PatchTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "No valid fields to update", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn patch_todo<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
    host: RequestHost,
    JsonBody(req): JsonBody<PatchTodoRequest>,
) -> Result<Json<TodoResponse>, HandlerError> {
    if req.title.as_deref().is_some_and(str::is_empty) {
        return Err(bad_request("Title must not be empty"));
    }

    let patch = TodoPatch::from(req);
    if patch.is_empty() {
        return Err(bad_request("No valid fields to update"));
    }
    let id = id.ok_or_else(|| not_found("Todo not found"))?;

    let todo = state
        .db()
        .todos()
        .update(id, &patch)
        .await
        .map_err(map_db_error("Todo not found"))?;

    Ok(Json(TodoResponse::new(todo, &host)))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(id): PathIds<Id>,
) -> Result<StatusCode, HandlerError> {
    let id = id.ok_or_else(|| not_found("Todo not found"))?;

    state
        .db()
        .todos()
        .delete(id)
        .await
        .map_err(map_db_error("Todo not found"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attach a tag to a todo
///
/// Attaching a tag that is already attached succeeds without creating a
/// second link.
#[utoipa::path(
    post,
    path = "/todos/{id}/tags/",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = AddTagRequest,
    responses(
        (status = 200, description = "Tag attached", body = AssociationResponse),
        (status = 400, description = "Tag id missing", body = ErrorResponse),
        (status = 404, description = "Todo or tag not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_todo_tag<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(todo_id): PathIds<Id>,
    JsonBody(req): JsonBody<AddTagRequest>,
) -> Result<Json<AssociationResponse>, HandlerError> {
    let tag_id = req
        .id
        .ok_or_else(|| bad_request("\"id\" is a required field"))?;
    let Some(todo_id) = todo_id else {
        warn!(tag_id, "No association created: unparseable todo id");
        return Err(not_found(ASSOCIATION_NOT_CREATED));
    };

    let link = state
        .db()
        .todos()
        .add_tag(todo_id, tag_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => {
                warn!(todo_id, tag_id, "No association created: todo or tag missing");
                not_found(ASSOCIATION_NOT_CREATED)
            }
            _ => internal_error(e),
        })?;

    Ok(Json(AssociationResponse {
        todo_id: link.todo_id,
        tag_id: link.tag_id,
    }))
}

/// List the tags attached to a todo
#[utoipa::path(
    get,
    path = "/todos/{id}/tags",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Tags attached to the todo", body = Vec<TagResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todo_tags<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(todo_id): PathIds<Id>,
    host: RequestHost,
) -> Result<Json<Vec<TagResponse>>, HandlerError> {
    let Some(todo_id) = todo_id else {
        return Ok(Json(Vec::new()));
    };

    let tags = state
        .db()
        .todos()
        .get_tags(todo_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(
        tags.into_iter()
            .map(|tag| TagResponse::new(tag, &host))
            .collect(),
    ))
}

/// Detach one tag from a todo
///
/// Succeeds even when the pair was never linked.
#[utoipa::path(
    delete,
    path = "/todos/{id}/tags/{tag_id}",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo ID"),
        ("tag_id" = i64, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag detached"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_todo_tag<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(ids): PathIds<(Id, Id)>,
) -> Result<StatusCode, HandlerError> {
    let Some((todo_id, tag_id)) = ids else {
        return Ok(StatusCode::NO_CONTENT);
    };

    state
        .db()
        .todos()
        .remove_tag(todo_id, tag_id)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Detach every tag from a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}/tags/",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "All tags detached"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_all_todo_tags<D: Database>(
    State(state): State<AppState<D>>,
    PathIds(todo_id): PathIds<Id>,
) -> Result<StatusCode, HandlerError> {
    let Some(todo_id) = todo_id else {
        return Ok(StatusCode::NO_CONTENT);
    };

    state
        .db()
        .todos()
        .remove_all_tags(todo_id)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}
