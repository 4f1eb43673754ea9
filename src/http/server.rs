//! HTTP server for the config API.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Attach a fresh `Config` to every request
//! - Expose the current snapshot and domain revisions
//! - Resolve per-ingress gateway overrides
//!
//! # Endpoints
//! - `GET /healthz`
//! - `GET /config`: the `Config` bound to this request
//! - `GET /config/revisions`: revision per registered domain
//! - `POST /config/gateways/resolve`: body is an ingress (or empty),
//!   answer is the gateway config for it

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::middleware::{attach_config, BoundConfig};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::overrides::{resolve_gateway_config, Ingress};
use crate::settings::ListenerSettings;
use crate::store::{to_context, Context, Store};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// HTTP server for the config API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(store: Store, settings: &ListenerSettings) -> Self {
        Self {
            router: build_router(store, settings),
        }
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(store: Store, settings: &ListenerSettings) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/config", get(get_config))
        .route("/config/revisions", get(get_revisions))
        .route("/config/gateways/resolve", post(resolve_gateways))
        .layer(middleware::from_fn_with_state(state.clone(), attach_config))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_config(BoundConfig(config): BoundConfig) -> Response {
    Json(config).into_response()
}

async fn get_revisions(State(state): State<AppState>) -> Json<BTreeMap<String, Option<u64>>> {
    let registry = state.store.registry();
    Json(
        registry
            .domains()
            .into_iter()
            .map(|domain| {
                let revision = registry.revision(&domain);
                (domain, revision)
            })
            .collect(),
    )
}

async fn resolve_gateways(BoundConfig(config): BoundConfig, body: Bytes) -> Response {
    let ingress: Option<Ingress> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(ing) => Some(ing),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected unparseable ingress");
                return error_response(StatusCode::BAD_REQUEST, format!("invalid ingress: {e}"));
            }
        }
    };

    let ctx = to_context(&Context::background(), config);
    match resolve_gateway_config(&ctx, ingress.as_ref()) {
        Ok(istio) => Json(istio).into_response(),
        Err(e) => {
            metrics::record_override_error();
            tracing::warn!(
                ingress = ingress.as_ref().map(|i| i.metadata.name.as_str()).unwrap_or_default(),
                error = %e,
                "Rejected gateway override"
            );
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
