//! Dev-mode reverse proxy.
//!
//! When the server runs with `--local`, unmatched paths are forwarded to the
//! frontend dev server so the whole stack can be driven from one port. This
//! is a development convenience only and is never active otherwise.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;

use crate::error::ApiError;
use crate::routes::AppState;

/// Forwards the request to the configured dev server and relays the
/// response back.
pub async fn forward(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let url = format!("{}{}", state.config().dev_proxy, path_and_query);
    let method = request.method().clone();

    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| ApiError::BadRequest(format!("error reading request body: {e}")))?;

    let upstream = state
        .proxy_client()
        .request(method, url)
        .body(body)
        .send()
        .await
        .map_err(|e| ApiError::BadRequest(format!("dev proxy: {e}")))?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("dev proxy: {e}")))?;

    let mut builder = Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::BadRequest(format!("dev proxy: {e}")))
}
