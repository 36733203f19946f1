//! Prediction over a loaded model bundle

use crate::error::PredictionError;
use crate::models::loader::ModelBundle;
use crate::types::features::{FeatureRecord, FeatureVector};
use crate::types::verdict::Verdict;
use tracing::{debug, warn};

/// Inference engine owning the process-wide model bundle.
pub struct InferenceEngine {
    bundle: ModelBundle,
}

impl InferenceEngine {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    /// Name of the underlying classifier
    pub fn model_name(&self) -> &str {
        self.bundle.classifier().name()
    }

    /// Align a record with the bundle's feature order
    pub fn prepare(&self, record: FeatureRecord) -> Result<FeatureVector, PredictionError> {
        prepare(record, &self.bundle)
    }

    /// Run the full prediction for one record
    pub fn predict(&self, record: FeatureRecord) -> Result<Verdict, PredictionError> {
        predict(record, &self.bundle)
    }
}

/// Reconcile, order and check a record against the bundle's feature names.
///
/// Features the record lacks are defaulted to 0.
pub fn prepare(
    mut record: FeatureRecord,
    bundle: &ModelBundle,
) -> Result<FeatureVector, PredictionError> {
    let feature_names = bundle.feature_names();

    let defaulted = record.reconcile(feature_names);
    for name in &defaulted {
        warn!(feature = %name, "Feature not collected by the form, defaulting to 0");
    }

    let vector = record.to_vector(feature_names);
    check_alignment(&vector.columns, feature_names)?;

    Ok(vector)
}

/// Verify a realized column order equals the expected one exactly.
pub fn check_alignment(columns: &[String], expected: &[String]) -> Result<(), PredictionError> {
    if columns != expected {
        return Err(PredictionError::FeatureMismatch {
            expected: expected.to_vec(),
            actual: columns.to_vec(),
        });
    }
    Ok(())
}

/// Prepare the record, scale it, classify it and render the verdict.
pub fn predict(record: FeatureRecord, bundle: &ModelBundle) -> Result<Verdict, PredictionError> {
    let vector = prepare(record, bundle)?;

    debug!(
        columns = ?vector.columns,
        values = ?vector.values,
        "Aligned feature vector"
    );

    let scaled = bundle
        .scaler()
        .transform(&vector.values)
        .map_err(PredictionError::Scaling)?;

    let label = bundle
        .classifier()
        .predict(&scaled)
        .map_err(PredictionError::Classification)?;

    let verdict = Verdict::from_label(label);

    debug!(
        model = bundle.classifier().name(),
        label = label,
        verdict = %verdict,
        "Prediction complete"
    );

    Ok(verdict)
}
