//! HTTP server command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::artifact::{self, DEFAULT_MODEL_DIR, MODEL_DIR_ENV};
use crate::config::{AppConfig, ServerConfig};
use crate::server::{self, AppState, ModelState};

/// Start the inference server
pub async fn serve(
    model_dir: Option<PathBuf>,
    port: u16,
    host: String,
    config_path: Option<PathBuf>,
    require_model: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::from_yaml(&path)?,
        None => AppConfig::default(),
    };

    let dir = resolve_model_dir(model_dir, config.model_dir.clone());

    // Load the artifact up front; absence degrades /predict to 503 instead
    // of failing startup, unless the launcher asked otherwise.
    let model_state = match artifact::load(&dir) {
        Ok(bundle) => {
            tracing::info!(
                model_version = bundle.version(),
                run_id = bundle.run_id(),
                source = %dir.display(),
                "model loaded"
            );
            ModelState::loaded(bundle)
        }
        Err(failure) => {
            if require_model {
                return Err(anyhow!(
                    "--require-model set and artifact load failed: {}",
                    failure.reason
                ));
            }
            tracing::warn!(
                source = %dir.display(),
                reason = %failure.reason,
                "starting without a model; /predict will return 503"
            );
            ModelState::failed(dir, &failure)
        }
    };

    let server_config = ServerConfig {
        port,
        host,
        ..config.server
    };

    server::start(Arc::new(AppState::new(model_state)), server_config).await
}

/// Resolve the artifact directory: CLI flag, then environment override,
/// then config file, then the conventional default.
pub(crate) fn resolve_model_dir(flag: Option<PathBuf>, config: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var(MODEL_DIR_ENV).ok().map(PathBuf::from))
        .or(config)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR))
}
