//! ONNX classifier backend (enabled with the `onnx` feature)

use crate::error::ModelError;
use crate::models::classifier::{check_input, Classifier};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX, reading the int64 label output.
pub struct OnnxClassifier {
    /// ONNX Runtime session (running needs exclusive access)
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    n_features: usize,
}

impl OnnxClassifier {
    /// Load an exported classifier from file
    pub fn load(path: &Path, n_features: usize) -> Result<Self> {
        ort::init().commit()?;

        info!(path = %path.display(), "Loading ONNX classifier");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Exported classifiers name their label output "label"
        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "label".to_string());

        info!(
            input = %input_name,
            output = %label_output,
            "ONNX classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_output,
            n_features,
        })
    }

    fn run(&self, features: &[f64]) -> Result<i64> {
        let shape = vec![1_i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let output = outputs
            .get(&self.label_output)
            .with_context(|| format!("Missing output {}", self.label_output))?;
        let (_, labels) = output.try_extract_tensor::<i64>()?;
        let label = labels
            .first()
            .copied()
            .context("Empty label output")?;

        debug!(label = label, "ONNX classifier label");
        Ok(label)
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        check_input(self.n_features, features)?;
        self.run(features)
            .map_err(|e| ModelError::Backend(format!("{:#}", e)))
    }

    fn width(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
