//! Router construction and shared request state.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tracing::debug;

use signet_registry::{RegistryClient, RegistryError};

use crate::config::ServerConfig;
use crate::{handlers, proxy};

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    registry: RegistryClient,
    proxy: reqwest::Client,
}

impl AppState {
    /// Builds the state from a server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry client cannot be created.
    pub fn new(config: ServerConfig) -> Result<Self, RegistryError> {
        let registry = RegistryClient::new(config.registry.clone())?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                proxy: reqwest::Client::new(),
            }),
        })
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Returns the shared registry client.
    #[must_use]
    pub fn registry(&self) -> &RegistryClient {
        &self.inner.registry
    }

    /// Returns the HTTP client used by the dev proxy.
    pub(crate) fn proxy_client(&self) -> &reqwest::Client {
        &self.inner.proxy
    }
}

/// Builds the service router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/check", get(handlers::check).options(preflight))
        .route(
            "/sign",
            post(handlers::sign)
                .options(preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route("/signed", get(handlers::signed).options(preflight));

    if state.config().local {
        router = router.fallback(proxy::forward);
    }

    router
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Answers CORS preflight with an empty 200; the headers themselves are
/// stamped by the [`cors`] middleware.
async fn preflight() {}

/// Stamps permissive CORS headers on every response, whatever its outcome,
/// and logs the request.
async fn cors(request: Request, next: Next) -> Response {
    debug!(method = %request.method(), path = %request.uri().path(), "request");

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("POST, GET, OPTIONS, PUT, DELETE"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(
            "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization",
        ),
    );
    response
}
