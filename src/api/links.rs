//! Self-link construction.
//!
//! Every resource in a response carries a `url` pointing back at itself,
//! built from the host the client used to reach the server.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use std::convert::Infallible;

use crate::db::Id;

/// Host the request was addressed to.
///
/// Taken from the `Host` header, then the URI authority, then `localhost`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHost(pub String);

impl<S> FromRequestParts<S> for RequestHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(RequestHost(host))
    }
}

impl RequestHost {
    /// Self-link for a todo.
    pub fn todo_url(&self, id: Id) -> String {
        format!("http://{}/todos/{}", self.0, id)
    }

    /// Self-link for a tag.
    pub fn tag_url(&self, id: Id) -> String {
        format!("http://{}/tags/{}", self.0, id)
    }
}
