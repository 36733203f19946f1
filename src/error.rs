//! Error types for artifact loading and per-request prediction

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Startup failure: the model artifact could not be turned into a bundle.
///
/// Fatal. The service never starts serving without a valid bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact {} is missing field `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("model artifact {} is invalid: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure raised by a scaler or classifier at call time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite value at feature index {index}")]
    NonFinite { index: usize },

    #[error("{0}")]
    Backend(String),
}

/// Per-request failure. Contained within a single prediction call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("unknown {question} option `{label}`")]
    UnknownCategory { question: String, label: String },

    #[error("mismatch in feature names or order: expected {expected:?}, got {actual:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("scaling failed: {0}")]
    Scaling(#[source] ModelError),

    #[error("classification failed: {0}")]
    Classification(#[source] ModelError),
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::UnknownCategory { .. } => ErrorKind::UnknownCategory,
            PredictionError::FeatureMismatch { .. } => ErrorKind::FeatureMismatch,
            PredictionError::Scaling(_) => ErrorKind::Scaling,
            PredictionError::Classification(_) => ErrorKind::Classification,
        }
    }
}

/// Error category reported to callers so each kind can be rendered separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request payload was not a valid answer set
    InvalidRequest,
    UnknownCategory,
    FeatureMismatch,
    Scaling,
    Classification,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::UnknownCategory => "unknown_category",
            ErrorKind::FeatureMismatch => "feature_mismatch",
            ErrorKind::Scaling => "scaling",
            ErrorKind::Classification => "classification",
        }
    }
}
