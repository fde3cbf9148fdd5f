//! Model artifact loading
//!
//! An exported artifact is a directory produced by the training pipeline:
//! - `metadata.json`: model version, run id, and the ordered feature schema
//! - `model.json`: the serialized estimator (intercept + per-feature weights)
//!
//! `load` validates the whole bundle up front so a successfully loaded
//! `ModelBundle` can serve inference without re-checking anything. Any
//! failure comes back as a `LoadFailure`; callers keep the process alive and
//! surface the reason through `/health` state.

mod estimator;
mod metadata;

pub use estimator::{Estimator, FeatureWeight};
pub use metadata::ArtifactMetadata;

use std::path::{Path, PathBuf};

use crate::error::LoadFailure;
use crate::schema::FeatureSpec;

/// Conventional artifact location when no override is given
pub const DEFAULT_MODEL_DIR: &str = "./artifacts/model";

/// Environment variable overriding the artifact directory
pub const MODEL_DIR_ENV: &str = "CARDIA_MODEL_DIR";

/// A loaded, validated model bundle.
///
/// Immutable after construction; shared across request handlers behind an
/// `Arc`. A reload builds a fresh bundle and swaps the shared reference.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    estimator: Estimator,
    metadata: ArtifactMetadata,
    source: PathBuf,
    /// True once estimator, metadata, and schema coverage all validated
    pub loaded: bool,
}

impl ModelBundle {
    /// Ordered feature contract for `/predict` payloads
    pub fn schema(&self) -> &[FeatureSpec] {
        &self.metadata.feature_schema
    }

    /// Opaque model version identifier
    pub fn version(&self) -> &str {
        &self.metadata.model_version
    }

    /// Training run identifier
    pub fn run_id(&self) -> &str {
        &self.metadata.run_id
    }

    /// Directory the bundle was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub(crate) fn estimator(&self) -> &Estimator {
        &self.estimator
    }
}

/// Load an artifact directory into a `ModelBundle`.
///
/// Read-only filesystem access, no network. Path resolution (env override,
/// defaults) is the caller's job.
pub fn load(path: &Path) -> Result<ModelBundle, LoadFailure> {
    if !path.is_dir() {
        return Err(LoadFailure::new(format!(
            "artifact directory {} does not exist",
            path.display()
        )));
    }

    let metadata = ArtifactMetadata::load(path)?;
    let estimator = Estimator::load(path)?;
    estimator.check_covers(&metadata.feature_schema)?;

    Ok(ModelBundle {
        estimator,
        metadata,
        source: path.to_path_buf(),
        loaded: true,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const METADATA_JSON: &str = r#"{
        "model_version": "1",
        "run_id": "abc123",
        "feature_schema": [
            {"name": "age", "kind": "numeric", "required": true},
            {"name": "chol", "kind": "numeric", "required": false},
            {"name": "thal", "kind": "categorical", "required": true}
        ]
    }"#;

    pub(crate) const MODEL_JSON: &str = r#"{
        "intercept": -1.0,
        "weights": {
            "age": {"numeric": 0.04},
            "chol": {"numeric": 0.001},
            "thal": {"categorical": {"3": 0.5, "6": 1.0, "7": 1.5}}
        }
    }"#;

    pub(crate) fn write_artifact(metadata: &str, model: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("metadata.json"), metadata).unwrap();
        std::fs::write(dir.path().join("model.json"), model).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_artifact() {
        let dir = write_artifact(METADATA_JSON, MODEL_JSON);
        let bundle = load(dir.path()).unwrap();

        assert!(bundle.loaded);
        assert_eq!(bundle.version(), "1");
        assert_eq!(bundle.run_id(), "abc123");
        assert_eq!(bundle.schema().len(), 3);
        assert_eq!(bundle.schema()[0].name, "age");
        assert_eq!(bundle.source(), dir.path());
    }

    #[test]
    fn test_load_missing_directory() {
        let err = load(Path::new("/nonexistent/model")).unwrap_err();
        assert!(err.reason.contains("does not exist"));
    }

    #[test]
    fn test_load_missing_metadata() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("model.json"), MODEL_JSON).unwrap();

        let err = load(dir.path()).unwrap_err();
        assert!(err.reason.contains("metadata.json"));
    }

    #[test]
    fn test_load_malformed_metadata() {
        let dir = write_artifact("{not json", MODEL_JSON);
        let err = load(dir.path()).unwrap_err();
        assert!(err.reason.contains("malformed"));
    }

    #[test]
    fn test_load_empty_schema() {
        let metadata = r#"{"model_version": "1", "run_id": "abc123", "feature_schema": []}"#;
        let dir = write_artifact(metadata, MODEL_JSON);
        let err = load(dir.path()).unwrap_err();
        assert!(err.reason.contains("empty feature schema"));
    }

    #[test]
    fn test_load_estimator_not_covering_schema() {
        let model = r#"{"intercept": 0.0, "weights": {"age": {"numeric": 0.04}}}"#;
        let dir = write_artifact(METADATA_JSON, model);
        let err = load(dir.path()).unwrap_err();
        assert!(err.reason.contains("missing a weight"));
    }

    #[test]
    fn test_load_malformed_model() {
        let dir = write_artifact(METADATA_JSON, "[]");
        let err = load(dir.path()).unwrap_err();
        assert!(err.reason.contains("model.json"));
    }
}
