//! API route configuration.

use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{
    self, AddTagRequest, AssociationResponse, CreateTodoRequest, ErrorResponse, HealthResponse,
    PatchTodoRequest, TagDetailResponse, TagRequest, TagResponse, TaggedTodoResponse,
    TodoResponse,
};
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically
/// and registers each path both with and without a trailing slash.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router
                .route($path, $method($($handler)::+::<$D>))
                .route(&toggle_trailing_slash($path), $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// `/todos` <-> `/todos/`
fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{}/", path),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Tags API",
        version = "0.1.0",
        description = "Todo list with tag annotations",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::list_todos,
        handlers::create_todo,
        handlers::delete_all_todos,
        handlers::get_todo,
        handlers::patch_todo,
        handlers::delete_todo,
        handlers::add_todo_tag,
        handlers::list_todo_tags,
        handlers::remove_todo_tag,
        handlers::remove_all_todo_tags,
        handlers::list_tags,
        handlers::delete_all_tags,
        handlers::create_tag,
        handlers::get_tag,
        handlers::patch_tag,
        handlers::delete_tag,
        handlers::list_tag_todos,
    ),
    components(
        schemas(
            HealthResponse,
            TodoResponse,
            CreateTodoRequest,
            PatchTodoRequest,
            AddTagRequest,
            AssociationResponse,
            TagResponse,
            TagDetailResponse,
            TaggedTodoResponse,
            TagRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "todos", description = "Todo management and tag association endpoints"),
        (name = "tags", description = "Tag management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    let system_routes = Router::new()
        .route("/health", get(handlers::health::<D>))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    // Todo routes (generic over Database)
    let todo_routes = routes!(D => {
        get "/todos" => handlers::list_todos,
        post "/todos" => handlers::create_todo,
        delete "/todos/" => handlers::delete_all_todos,
        get "/todos/{id}" => handlers::get_todo,
        patch "/todos/{id}" => handlers::patch_todo,
        delete "/todos/{id}" => handlers::delete_todo,
        post "/todos/{id}/tags/" => handlers::add_todo_tag,
        get "/todos/{id}/tags" => handlers::list_todo_tags,
        delete "/todos/{id}/tags/{tag_id}" => handlers::remove_todo_tag,
        delete "/todos/{id}/tags/" => handlers::remove_all_todo_tags,
    });

    // Tag routes (generic over Database)
    let tag_routes = routes!(D => {
        get "/tags/" => handlers::list_tags,
        delete "/tags/" => handlers::delete_all_tags,
        post "/tags/" => handlers::create_tag,
        get "/tags/{id}" => handlers::get_tag,
        patch "/tags/{id}" => handlers::patch_tag,
        delete "/tags/{id}" => handlers::delete_tag,
        get "/tags/{id}/todos" => handlers::list_tag_todos,
    });

    system_routes
        .merge(todo_routes)
        .merge(tag_routes)
        .merge(Scalar::with_url("/docs", api))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
