//! HTTP server for model serving
//!
//! Composes the artifact, schema, engine, and metrics modules behind three
//! routes: `/health`, `/predict`, and `/metrics`.

mod handlers;
mod middleware;
mod routes;


use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use handlers::{AppState, ModelState, METRICS_CONTENT_TYPE};
pub use middleware::REQUEST_ID_HEADER;
pub use routes::api_routes;

/// Build the full application router with middleware applied.
///
/// Split out of `start` so tests can drive the router without binding a
/// listener.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut app = api_routes()
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::track_requests,
        ))
        .with_state(state);

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }
    if config.request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Start the HTTP serving loop
pub async fn start(state: Arc<AppState>, config: ServerConfig) -> Result<()> {
    let app = build_router(state, &config);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("  POST /predict - Model prediction");
    tracing::info!("  GET  /metrics - Prometheus metrics");

    axum::serve(listener, app).await?;

    Ok(())
}
