//! Model artifact, scaler and classifier components

pub mod classifier;
pub mod inference;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use classifier::Classifier;
pub use inference::InferenceEngine;
pub use loader::{ArtifactLoader, ModelBundle};
pub use scaler::Scaler;
