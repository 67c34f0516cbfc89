//! Lenient request extractors.
//!
//! Rejections from these never reach the client as axum's plain-text
//! responses: bodies fail with a JSON 400, and unparseable path ids are
//! handed to the handler as "no such row".

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

use super::handlers::{HandlerError, bad_request};

/// JSON request body.
///
/// The `Content-Type` header is not required and an empty body reads as `{}`,
/// so a bodyless request reaches the handler's own field validation.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| bad_request(rejection.body_text()))?;

        let raw: &[u8] = if bytes.trim_ascii().is_empty() {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(raw)
            .map(Self)
            .map_err(|e| bad_request(format!("Invalid JSON body: {}", e)))
    }
}

/// Path ids, `None` when a segment is not a valid id.
///
/// Such an id cannot name a stored row, so handlers answer as they would
/// for a missing one.
#[derive(Debug)]
pub struct PathIds<T>(pub Option<T>);

impl<T, S> FromRequestParts<S> for PathIds<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(ids)) => Ok(Self(Some(ids))),
            Err(rejection) => {
                debug!(%rejection, path = parts.uri.path(), "Unparseable path id");
                Ok(Self(None))
            }
        }
    }
}
