//! Serialized logistic estimator
//!
//! The training pipeline exports the fitted classifier as `model.json`:
//! an intercept plus one weight entry per schema feature. Numeric features
//! carry a single coefficient; categorical features carry a per-level weight
//! table. Train-time mean imputation is folded into the intercept, so a
//! missing optional feature contributes nothing to the score.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, LoadFailure};
use crate::schema::{FeatureKind, FeatureSpec, FeatureValue, PredictionRequest};

/// Weight entry for one feature
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureWeight {
    /// Coefficient applied to the raw numeric value
    Numeric(f64),
    /// Weight per categorical level
    Categorical(HashMap<String, f64>),
}

/// Fitted binary classifier over the artifact's feature schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimator {
    intercept: f64,
    weights: HashMap<String, FeatureWeight>,
}

impl Estimator {
    /// Read and parse `model.json` from the artifact directory
    pub fn load(dir: &Path) -> Result<Self, LoadFailure> {
        let path = dir.join("model.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| LoadFailure::new(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| LoadFailure::new(format!("malformed {}: {}", path.display(), e)))
    }

    /// Verify every schema feature has a weight of the matching kind.
    ///
    /// Run once at load time so inference never has to handle an absent
    /// weight entry.
    pub fn check_covers(&self, schema: &[FeatureSpec]) -> Result<(), LoadFailure> {
        for spec in schema {
            match (self.weights.get(&spec.name), spec.kind) {
                (Some(FeatureWeight::Numeric(_)), FeatureKind::Numeric)
                | (Some(FeatureWeight::Categorical(_)), FeatureKind::Categorical) => {}
                (Some(_), _) => {
                    return Err(LoadFailure::new(format!(
                        "estimator weight for feature '{}' does not match its declared kind",
                        spec.name
                    )));
                }
                (None, _) => {
                    return Err(LoadFailure::new(format!(
                        "estimator is missing a weight for schema feature '{}'",
                        spec.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Positive-class probability for an ordered, validated feature vector
    pub fn predict_proba(&self, request: &PredictionRequest) -> Result<f64, InferenceError> {
        let mut score = self.intercept;

        for (name, value) in request.iter() {
            let Some(weight) = self.weights.get(name) else {
                // Unreachable after check_covers, but never default silently
                return Err(InferenceError::ExecutionFailure(format!(
                    "no weight for feature '{name}'"
                )));
            };

            match (weight, value) {
                (FeatureWeight::Numeric(coef), FeatureValue::Numeric(x)) => {
                    score += coef * x;
                }
                (FeatureWeight::Categorical(levels), FeatureValue::Categorical(level)) => {
                    match levels.get(level) {
                        Some(w) => score += w,
                        None => {
                            return Err(InferenceError::ExecutionFailure(format!(
                                "unseen level '{level}' for categorical feature '{name}'"
                            )));
                        }
                    }
                }
                (_, FeatureValue::Missing) => {}
                _ => {
                    return Err(InferenceError::ExecutionFailure(format!(
                        "value kind does not match weight kind for feature '{name}'"
                    )));
                }
            }
        }

        Ok(sigmoid(score))
    }
}

fn sigmoid(x: f64) -> f64 {
    (1.0 / (1.0 + (-x).exp())).clamp(0.0, 1.0)
}
