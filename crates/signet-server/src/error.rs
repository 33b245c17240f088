//! HTTP-boundary error handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
///
/// Every variant is returned to the client as a 500 with the error text in
/// the body: this minimal service does not differentiate error statuses. A
/// production-grade deployment would map `NoSignatures` to 404 and
/// `BadRequest`/`Reference` to 400 before exposing this surface publicly.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The inbound request is malformed: missing bearer token, missing
    /// query parameter, unparsable body, or wrong method.
    #[error("{0}")]
    BadRequest(String),

    /// A registry-side operation failed.
    #[error(transparent)]
    Registry(#[from] signet_registry::RegistryError),

    /// The signature codec failed.
    #[error(transparent)]
    Codec(#[from] signet_core::CodecError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {self}")).into_response()
    }
}
