//! Fitted feature scalers applied before classification

use crate::error::ModelError;
use serde::Deserialize;

/// A fitted transformation over a fixed-width feature vector.
pub trait Scaler: Send + Sync {
    /// Transform one row. Fails on width mismatch or non-finite output.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Number of features the scaler was fitted on
    fn width(&self) -> usize;
}

/// Serialized scaler section of the artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalerSpec {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalerSpec {
    /// Validate the fitted parameters and build the scaler.
    pub fn build(self) -> Result<Box<dyn Scaler>, String> {
        match self {
            ScalerSpec::Standard { mean, scale } => {
                Ok(Box::new(StandardScaler::new(mean, scale)?))
            }
            ScalerSpec::MinMax { min, scale } => Ok(Box::new(MinMaxScaler::new(min, scale)?)),
        }
    }
}

/// Standardization: `(x - mean) / scale`
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        if mean.len() != scale.len() {
            return Err(format!(
                "standard scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            ));
        }
        if let Some(i) = mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("standard scaler mean {} is not finite", i));
        }
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(format!("standard scaler scale {} is zero or not finite", i));
        }
        Ok(Self { mean, scale })
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.mean.len(), features)?;

        let scaled: Vec<f64> = features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        check_finite(&scaled)?;
        Ok(scaled)
    }

    fn width(&self) -> usize {
        self.mean.len()
    }
}

/// Min-max scaling in the fitted layout: `x * scale + min`
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        if min.len() != scale.len() {
            return Err(format!(
                "min-max scaler has {} offsets but {} scales",
                min.len(),
                scale.len()
            ));
        }
        if min.iter().chain(&scale).any(|v| !v.is_finite()) {
            return Err("min-max scaler has non-finite parameters".to_string());
        }
        Ok(Self { min, scale })
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.min.len(), features)?;

        let scaled: Vec<f64> = features
            .iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(x, (min, scale))| x * scale + min)
            .collect();

        check_finite(&scaled)?;
        Ok(scaled)
    }

    fn width(&self) -> usize {
        self.min.len()
    }
}

fn check_width(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

fn check_finite(values: &[f64]) -> Result<(), ModelError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ModelError::NonFinite { index }),
        None => Ok(()),
    }
}
