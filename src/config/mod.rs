//! Configuration for the serving process
//!
//! Settings come from an optional YAML file plus CLI flags and the
//! `CARDIA_MODEL_DIR` environment override; precedence is resolved at the
//! CLI layer, not here.

mod server;

pub use server::ServerConfig;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Artifact directory holding the exported model
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
