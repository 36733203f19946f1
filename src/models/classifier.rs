//! Binary classifiers that can be restored from a model artifact

use crate::error::ModelError;
use serde::Deserialize;
use std::path::Path;

/// A trained classifier over a fixed-width, already-scaled feature vector.
pub trait Classifier: Send + Sync {
    /// Predict the class label for one row
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;

    /// Number of features the classifier was trained on
    fn width(&self) -> usize;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Serialized classifier section of the artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        #[serde(default = "default_classes")]
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
    /// Exported ONNX graph, path relative to the artifact's directory
    Onnx { path: String, n_features: usize },
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

impl ClassifierSpec {
    /// Validate the trained parameters and build the classifier.
    ///
    /// `base_dir` resolves relative paths of external model files.
    pub fn build(self, base_dir: &Path) -> Result<Box<dyn Classifier>, String> {
        match self {
            ClassifierSpec::LogisticRegression {
                coefficients,
                intercept,
            } => Ok(Box::new(LogisticRegression::new(coefficients, intercept)?)),
            ClassifierSpec::RandomForest {
                classes,
                n_features,
                trees,
            } => Ok(Box::new(RandomForest::new(classes, n_features, trees)?)),
            ClassifierSpec::Onnx { path, n_features } => {
                build_onnx(&base_dir.join(path), n_features)
            }
        }
    }
}

#[cfg(feature = "onnx")]
fn build_onnx(path: &Path, n_features: usize) -> Result<Box<dyn Classifier>, String> {
    let classifier = super::onnx::OnnxClassifier::load(path, n_features)
        .map_err(|e| format!("{:#}", e))?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn build_onnx(path: &Path, _n_features: usize) -> Result<Box<dyn Classifier>, String> {
    Err(format!(
        "classifier {} needs ONNX support; rebuild with the `onnx` feature",
        path.display()
    ))
}

/// Linear model: label 1 iff `coefficients · x + intercept > 0`
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        if coefficients.is_empty() {
            return Err("logistic regression has no coefficients".to_string());
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("logistic regression has non-finite parameters".to_string());
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_input(self.coefficients.len(), features)?;
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let z = self.decision_function(features)?;
        Ok(if z > 0.0 { 1 } else { 0 })
    }

    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

/// Node of a fitted decision tree, in flat array layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes to `left`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (counts or fractions)
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            i, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // Children must point forward so traversal always terminates
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} class weights, expected {}",
                            i,
                            value.len(),
                            n_classes
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0)
                        || value.iter().sum::<f64>() <= 0.0
                    {
                        return Err(format!("leaf {} has invalid class weights", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Class weights of the leaf this row falls into
    fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Ensemble of decision trees voting by averaged class probability.
#[derive(Debug, Clone)]
pub struct RandomForest {
    classes: Vec<i64>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(
        classes: Vec<i64>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("random forest has no classes".to_string());
        }
        if trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(n_features, classes.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(Self {
            classes,
            n_features,
            trees,
        })
    }

    /// Mean class probabilities across trees
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_input(self.n_features, features)?;

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(features);
            let total: f64 = leaf.iter().sum();
            for (p, w) in proba.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(features)?;

        // First class wins ties
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }

    fn width(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

pub(crate) fn check_input(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { index });
    }
    Ok(())
}
