//! Error types for artifact loading, validation, and inference

use thiserror::Error;

/// Failure to load a model artifact from disk.
///
/// Never fatal: the server keeps running with a degraded `/predict`
/// (503) and surfaces the reason through internal state.
#[derive(Debug, Clone, Error)]
#[error("failed to load model artifact: {reason}")]
pub struct LoadFailure {
    /// Human-readable reason for the failure
    pub reason: String,
}

impl LoadFailure {
    /// Create a load failure with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Client payload defect detected against the bundle's feature schema.
///
/// Always recoverable per-request; mapped to HTTP 422.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Payload is not a flat JSON object of feature -> scalar value
    #[error("payload must be a flat JSON object of feature values")]
    MalformedPayload,

    /// A feature marked required by the schema is absent or null
    #[error("missing required feature: {feature}")]
    MissingFeature {
        /// Name of the absent feature
        feature: String,
    },

    /// A present value is incompatible with the feature's declared kind
    #[error("incompatible value type for feature: {feature}")]
    TypeMismatch {
        /// Name of the offending feature
        feature: String,
    },
}

impl ValidationError {
    /// Machine-readable kind, used as the `error` field of 422 bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPayload => "MalformedPayload",
            Self::MissingFeature { .. } => "MissingFeature",
            Self::TypeMismatch { .. } => "TypeMismatch",
        }
    }

    /// The offending feature name, when the error concerns one
    pub fn feature(&self) -> Option<&str> {
        match self {
            Self::MalformedPayload => None,
            Self::MissingFeature { feature } | Self::TypeMismatch { feature } => Some(feature),
        }
    }
}

/// Estimator fault during inference.
///
/// Mapped to HTTP 500; the process stays up.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// The estimator could not produce a probability for this input
    #[error("estimator execution failed: {0}")]
    ExecutionFailure(String),
}
