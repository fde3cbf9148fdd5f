//! Inference invocation
//!
//! Feeds a validated, schema-ordered feature vector to the bundle's
//! estimator and shapes the response. Synchronous and CPU-bound; callers
//! must check `bundle.loaded` before invoking (the HTTP layer short-circuits
//! to 503 when no bundle is loaded).

use serde::{Deserialize, Serialize};

use crate::artifact::ModelBundle;
use crate::error::InferenceError;
use crate::schema::PredictionRequest;

/// Probability at or above which the positive class is predicted
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Outcome of one inference call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary class, thresholded on the positive-class probability
    pub prediction: u8,
    /// Positive-class probability in [0, 1]
    pub probability: f64,
    /// Version of the model that produced the result
    pub model_version: String,
    /// Training run the model came from
    pub run_id: String,
}

/// Run the bundle's estimator over a validated request.
///
/// Deterministic for a fixed bundle and input. Estimator faults propagate as
/// `InferenceError`, never a silent default.
pub fn predict(
    bundle: &ModelBundle,
    request: &PredictionRequest,
) -> Result<PredictionResult, InferenceError> {
    let probability = bundle.estimator().predict_proba(request)?;
    let prediction = u8::from(probability >= POSITIVE_THRESHOLD);

    Ok(PredictionResult {
        prediction,
        probability,
        model_version: bundle.version().to_string(),
        run_id: bundle.run_id().to_string(),
    })
}
