//! Artifact metadata descriptor

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadFailure;
use crate::schema::FeatureSpec;

/// Training provenance and feature contract shipped next to the estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Opaque model version identifier
    pub model_version: String,
    /// Training run identifier
    pub run_id: String,
    /// Ordered feature contract for `/predict` payloads
    pub feature_schema: Vec<FeatureSpec>,
}

impl ArtifactMetadata {
    /// Read and parse `metadata.json` from the artifact directory
    pub fn load(dir: &Path) -> Result<Self, LoadFailure> {
        let path = dir.join("metadata.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| LoadFailure::new(format!("cannot read {}: {}", path.display(), e)))?;
        let metadata: Self = serde_json::from_str(&content)
            .map_err(|e| LoadFailure::new(format!("malformed {}: {}", path.display(), e)))?;

        if metadata.feature_schema.is_empty() {
            return Err(LoadFailure::new(format!(
                "{} declares an empty feature schema",
                path.display()
            )));
        }

        Ok(metadata)
    }
}
