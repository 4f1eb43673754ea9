//! Binding the current `Config` to each request.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::store::context::{attach_to_request, try_from_extensions};
use crate::store::Config;

/// Load a fresh `Config` and attach it to the request before any handler
/// runs. The request sees one snapshot for its whole lifetime.
pub async fn attach_config(State(state): State<AppState>, mut request: Request<Body>, next: Next) -> Response {
    attach_to_request(&mut request, state.store.load());
    next.run(request).await
}

/// Extractor for the `Config` attached by [`attach_config`].
#[derive(Debug, Clone)]
pub struct BoundConfig(pub Config);

impl<S: Send + Sync> FromRequestParts<S> for BoundConfig {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match try_from_extensions(&parts.extensions) {
            Some(config) => Ok(BoundConfig(config.clone())),
            None => {
                tracing::error!(path = %parts.uri.path(), "Request reached a handler without a Config attached");
                Err((StatusCode::INTERNAL_SERVER_ERROR, "configuration not attached to request"))
            }
        }
    }
}
