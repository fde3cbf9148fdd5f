//! Request correlation, metrics, and logging middleware

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::metrics::{Route, StatusClass};
use crate::server::handlers::AppState;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps every handler: assigns a correlation id, times the request,
/// records exactly one metrics observation, and emits one structured log
/// line per completed request.
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    // Honor a caller-supplied correlation id so upstream proxies can thread
    // their own ids through
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let route = Route::from_path(request.uri().path());
    let method = request.method().clone();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();
    state
        .metrics
        .observe(route, StatusClass::from_status(status), elapsed);

    let (model_version, run_id) = {
        let model = state.model.read().await;
        match model.bundle() {
            Some(bundle) => (
                Some(bundle.version().to_string()),
                Some(bundle.run_id().to_string()),
            ),
            None => (None, None),
        }
    };

    tracing::info!(
        request_id = %request_id,
        route = route.label(),
        method = %method,
        status = status.as_u16(),
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        model_version = model_version.as_deref().unwrap_or(""),
        run_id = run_id.as_deref().unwrap_or(""),
        "request complete"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
