//! Prediction verdict and the response envelope sent back to callers

use crate::error::{ErrorKind, PredictionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "at risk")]
    AtRisk,
    #[serde(rename = "not at risk")]
    NotAtRisk,
}

impl Verdict {
    /// Render a classifier label. Only label 1 means at risk.
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            Verdict::AtRisk
        } else {
            Verdict::NotAtRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::AtRisk => "at risk",
            Verdict::NotAtRisk => "not at risk",
        }
    }

    /// Sentence shown to the person who filled in the form
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::AtRisk => {
                "You are at risk of a stroke. Please consult a healthcare professional."
            }
            Verdict::NotAtRisk => "You are not at risk of a stroke. Stay healthy!",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome carried by a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { verdict: Verdict, message: String },
    Error { kind: ErrorKind, message: String },
}

/// Reply to a single prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Unique response identifier
    pub request_id: String,

    /// When the request was evaluated
    pub evaluated_at: DateTime<Utc>,

    #[serde(flatten)]
    pub outcome: Outcome,
}

impl PredictionResponse {
    fn new(outcome: Outcome) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            evaluated_at: Utc::now(),
            outcome,
        }
    }

    pub fn verdict(verdict: Verdict) -> Self {
        Self::new(Outcome::Ok {
            verdict,
            message: verdict.message().to_string(),
        })
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(Outcome::Error {
            kind,
            message: message.into(),
        })
    }

    pub fn from_result(result: &Result<Verdict, PredictionError>) -> Self {
        match result {
            Ok(verdict) => Self::verdict(*verdict),
            Err(e) => Self::error(e.kind(), e.to_string()),
        }
    }
}
