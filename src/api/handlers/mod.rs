//! HTTP handlers for todos, tags and system endpoints.

mod system;
mod tags;
mod todos;


pub use system::*;
pub use tags::*;
pub use todos::*;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::DbError;

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Todo not found")]
    pub error: String,
}

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// 400 with the given message.
pub(crate) fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// 404 with the given message.
pub(crate) fn not_found(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// 500 with a generic message. The cause is logged, never returned.
pub(crate) fn internal_error(e: DbError) -> HandlerError {
    error!(error = %e, "Storage failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
}

/// Map a store error: `NotFound` becomes 404 with `not_found_message`,
/// `Validation` becomes 400, anything else 500.
pub(crate) fn map_db_error(not_found_message: &str) -> impl FnOnce(DbError) -> HandlerError + '_ {
    move |e| match e {
        DbError::NotFound { .. } => not_found(not_found_message),
        DbError::Validation { message } => bad_request(message),
        _ => internal_error(e),
    }
}
