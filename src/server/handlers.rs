//! HTTP request handlers

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::artifact::ModelBundle;
use crate::engine;
use crate::error::LoadFailure;
use crate::metrics::MetricsRegistry;
use crate::schema;

/// Content type for the Prometheus text exposition
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Outcome of the startup (or latest reload) artifact load
#[derive(Debug, Default)]
pub struct ModelState {
    bundle: Option<Arc<ModelBundle>>,
    last_error: Option<String>,
    source: Option<PathBuf>,
}

impl ModelState {
    /// State for a successfully loaded bundle
    pub fn loaded(bundle: ModelBundle) -> Self {
        Self {
            source: Some(bundle.source().to_path_buf()),
            bundle: Some(Arc::new(bundle)),
            last_error: None,
        }
    }

    /// State after a failed load; the reason is kept for diagnostics
    pub fn failed(source: PathBuf, failure: &LoadFailure) -> Self {
        Self {
            bundle: None,
            last_error: Some(failure.reason.clone()),
            source: Some(source),
        }
    }

    /// Cheap shared handle to the bundle, if one is loaded
    pub fn bundle(&self) -> Option<Arc<ModelBundle>> {
        self.bundle.clone()
    }

    /// Reason the last load failed, if it did
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Where the artifact was loaded (or attempted) from
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }
}

/// Shared application state, dependency-injected at startup
pub struct AppState {
    /// Loaded model; a reload writes a whole new bundle so in-flight
    /// requests keep the one they cloned out
    pub model: tokio::sync::RwLock<ModelState>,
    pub metrics: MetricsRegistry,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self {
            model: tokio::sync::RwLock::new(model),
            metrics: MetricsRegistry::new(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model_version: Option<String>,
    pub run_id: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

/// Health probe.
///
/// Always 200: a missing model is a degraded-capability signal, not a
/// service failure.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let model = state.model.read().await;
    let bundle = model.bundle();

    let response = HealthResponse {
        status: "ok",
        model_loaded: bundle.is_some(),
        model_version: bundle.as_ref().map(|b| b.version().to_string()),
        run_id: bundle.as_ref().map(|b| b.run_id().to_string()),
    };
    (StatusCode::OK, Json(response))
}

/// Prediction endpoint
pub async fn predict(State(state): State<Arc<AppState>>, Json(payload): Json<Value>) -> Response {
    let bundle = { state.model.read().await.bundle() };
    let Some(bundle) = bundle else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody {
                error: "model_not_loaded".to_string(),
                feature: None,
            }),
        )
            .into_response();
    };

    let request = match schema::validate(&payload, bundle.schema()) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: e.kind().to_string(),
                    feature: e.feature().map(str::to_string),
                }),
            )
                .into_response();
        }
    };

    match engine::predict(&bundle, &request) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!(
                model_version = bundle.version(),
                run_id = bundle.run_id(),
                error = %e,
                "inference failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "inference_failed".to_string(),
                    feature: None,
                }),
            )
                .into_response()
        }
    }
}

/// Prometheus scrape endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}
