//! Model artifact loader

use crate::error::ArtifactError;
use crate::models::classifier::{Classifier, ClassifierSpec};
use crate::models::scaler::{Scaler, ScalerSpec};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Trained classifier, fitted scaler and the canonical feature order.
///
/// Built once at startup and only read afterwards.
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn Scaler>,
    feature_names: Vec<String>,
}

impl ModelBundle {
    /// Assemble a bundle from already-built parts
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn Scaler>,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            classifier,
            scaler,
            feature_names,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    /// Column order the classifier was trained on
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("classifier", &self.classifier.name())
            .field("scaler_width", &self.scaler.width())
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

/// On-disk layout of the artifact
#[derive(Debug, Deserialize)]
struct ArtifactDocument {
    #[serde(default, alias = "classifier")]
    model: Option<ClassifierSpec>,
    #[serde(default, alias = "Scaler")]
    scaler: Option<ScalerSpec>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// Loader for serialized model bundles
#[derive(Debug, Default)]
pub struct ArtifactLoader;

impl ArtifactLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read and validate a bundle from file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ModelBundle, ArtifactError> {
        let path = path.as_ref();

        info!(path = %path.display(), "Loading model artifact");

        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.from_slice(&bytes, path)
    }

    /// Parse and validate a bundle from memory.
    ///
    /// `origin` names the artifact in errors and anchors relative model paths.
    pub fn from_slice(&self, bytes: &[u8], origin: &Path) -> Result<ModelBundle, ArtifactError> {
        let document: ArtifactDocument =
            serde_json::from_slice(bytes).map_err(|source| ArtifactError::Corrupt {
                path: origin.to_path_buf(),
                source,
            })?;

        let missing = |field| ArtifactError::MissingField {
            path: origin.to_path_buf(),
            field,
        };
        let invalid = |reason: String| ArtifactError::Invalid {
            path: origin.to_path_buf(),
            reason,
        };

        let classifier_spec = document.model.ok_or_else(|| missing("model"))?;
        let scaler_spec = document.scaler.ok_or_else(|| missing("scaler"))?;
        let feature_names = document
            .feature_names
            .ok_or_else(|| missing("feature_names"))?;

        if feature_names.is_empty() {
            return Err(invalid("feature_names is empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = feature_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(invalid(format!("duplicate feature name `{}`", dup)));
        }

        let base_dir = origin.parent().unwrap_or_else(|| Path::new("."));
        let scaler = scaler_spec.build().map_err(invalid)?;
        let classifier = classifier_spec.build(base_dir).map_err(invalid)?;

        let n = feature_names.len();
        if scaler.width() != n {
            return Err(invalid(format!(
                "scaler was fitted on {} features, artifact lists {}",
                scaler.width(),
                n
            )));
        }
        if classifier.width() != n {
            return Err(invalid(format!(
                "classifier was trained on {} features, artifact lists {}",
                classifier.width(),
                n
            )));
        }

        info!(
            path = %origin.display(),
            classifier = classifier.name(),
            features = n,
            "Model artifact loaded successfully"
        );

        Ok(ModelBundle::new(classifier, scaler, feature_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "model": {"type": "logistic_regression", "coefficients": [1.0, -1.0], "intercept": 0.0},
        "Scaler": {"type": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]},
        "feature_names": ["age", "bmi"]
    }"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let bundle = ArtifactLoader::new().load(file.path()).unwrap();

        assert_eq!(bundle.feature_names(), &["age".to_string(), "bmi".to_string()]);
        assert_eq!(bundle.classifier().name(), "logistic_regression");
        assert_eq!(bundle.scaler().width(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactLoader::new()
            .load(dir.path().join("absent.json"))
            .unwrap_err();

        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95pickle-bytes").unwrap();

        let err = ArtifactLoader::new().load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { .. }));
    }

    #[test]
    fn test_missing_fields() {
        let loader = ArtifactLoader::new();
        let origin = Path::new("bundle.json");

        let no_names = r#"{
            "model": {"type": "logistic_regression", "coefficients": [1.0], "intercept": 0.0},
            "scaler": {"type": "standard", "mean": [0.0], "scale": [1.0]}
        }"#;
        let err = loader.from_slice(no_names.as_bytes(), origin).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::MissingField {
                field: "feature_names",
                ..
            }
        ));

        let no_model = r#"{
            "scaler": {"type": "standard", "mean": [0.0], "scale": [1.0]},
            "feature_names": ["age"]
        }"#;
        let err = loader.from_slice(no_model.as_bytes(), origin).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingField { field: "model", .. }));

        let no_scaler = r#"{
            "model": {"type": "logistic_regression", "coefficients": [1.0], "intercept": 0.0},
            "feature_names": ["age"]
        }"#;
        let err = loader.from_slice(no_scaler.as_bytes(), origin).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingField { field: "scaler", .. }));
    }

    #[test]
    fn test_inconsistent_widths() {
        let doc = r#"{
            "model": {
                "type": "logistic_regression",
                "coefficients": [1.0, 2.0, 3.0],
                "intercept": 0.0
            },
            "scaler": {"type": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]},
            "feature_names": ["age", "bmi"]
        }"#;
        let err = ArtifactLoader::new()
            .from_slice(doc.as_bytes(), Path::new("bundle.json"))
            .unwrap_err();

        assert!(matches!(err, ArtifactError::Invalid { .. }));
        assert!(err.to_string().contains("classifier was trained on 3 features"));
    }

    #[test]
    fn test_duplicate_feature_names() {
        let doc = r#"{
            "model": {"type": "logistic_regression", "coefficients": [1.0, 2.0], "intercept": 0.0},
            "scaler": {"type": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]},
            "feature_names": ["age", "age"]
        }"#;
        let err = ArtifactLoader::new()
            .from_slice(doc.as_bytes(), Path::new("bundle.json"))
            .unwrap_err();

        assert!(err.to_string().contains("duplicate feature name `age`"));
    }

    #[test]
    fn test_shipped_artifact_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/models/stroke_bundle.json");
        let bundle = ArtifactLoader::new().load(path).unwrap();

        assert_eq!(bundle.feature_names().len(), 10);
        assert_eq!(bundle.feature_names()[6], "Residence_type");
    }
}
