//! Type definitions for the stroke risk service

pub mod answers;
pub mod features;
pub mod verdict;

pub use answers::{FormBounds, RawAnswers};
pub use features::{FeatureRecord, FeatureVector};
pub use verdict::{Outcome, PredictionResponse, Verdict};
