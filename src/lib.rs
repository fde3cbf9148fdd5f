//! Cardia - inference server for an exported heart disease classifier
//!
//! Cardia turns a trained, versioned model artifact into a live HTTP
//! endpoint with health reporting and request-level metrics. It does not
//! train models or engineer features; it serves what the training pipeline
//! exported and exposes operational signals about that serving.
//!
//! # Architecture
//!
//! - **artifact**: locates, validates, and holds the model bundle
//! - **schema**: validates `/predict` payloads against the feature contract
//! - **engine**: runs the estimator and shapes the prediction response
//! - **metrics**: thread-safe counters/histograms in Prometheus format
//! - **server**: axum routes plus correlation-id / metrics middleware
//!
//! # Example
//!
//! ```bash
//! # Serve the default artifact location (./artifacts/model)
//! cardia serve --port 8080
//!
//! # Serve an explicit artifact, failing fast if it cannot load
//! cardia serve --model-dir ./artifacts/model --require-model
//!
//! # Inspect an artifact's version, run id, and feature schema
//! cardia info --model-dir ./artifacts/model
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod schema;
pub mod server;

// Re-export key types
pub use artifact::{load, ModelBundle};
pub use config::{AppConfig, ServerConfig};
pub use engine::{predict, PredictionResult};
pub use error::{InferenceError, LoadFailure, ValidationError};
pub use metrics::MetricsRegistry;
pub use schema::{validate, FeatureKind, FeatureSpec, FeatureValue, PredictionRequest};
