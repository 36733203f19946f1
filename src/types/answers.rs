//! Raw questionnaire answers as supplied by the form

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One answer per question, exactly as the form collected it.
///
/// Categorical answers are option labels; numeric answers are bounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnswers {
    /// "Female" or "Male"
    pub gender: String,

    /// Age in whole years
    pub age: u32,

    /// "Yes" or "No"
    pub hypertension: String,

    /// "Yes" or "No"
    pub heart_disease: String,

    /// "Yes" or "No"
    pub ever_married: String,

    /// Govt_job, Private, Self-employed or children
    pub work_type: String,

    /// "Rural" or "Urban"
    #[serde(rename = "Residence_type", alias = "residence_type")]
    pub residence_type: String,

    /// Average glucose level (mg/dL)
    pub avg_glucose_level: f64,

    /// Body mass index
    pub bmi: f64,

    /// formerly smoked, never smoked, smokes or Unknown
    pub smoking_status: String,
}

impl RawAnswers {
    /// Clamp numeric answers into the form's bounds.
    pub fn clamped(mut self, bounds: &FormBounds) -> Self {
        let age = self.age.clamp(bounds.age_min, bounds.age_max);
        let glucose = bounds.clamp_glucose(self.avg_glucose_level);
        let bmi = bounds.clamp_bmi(self.bmi);

        if age != self.age || glucose != self.avg_glucose_level || bmi != self.bmi {
            warn!(
                age = self.age,
                avg_glucose_level = self.avg_glucose_level,
                bmi = self.bmi,
                "Numeric answers outside form bounds were clamped"
            );
        }

        self.age = age;
        self.avg_glucose_level = glucose;
        self.bmi = bmi;
        self
    }
}

impl Default for RawAnswers {
    fn default() -> Self {
        Self {
            gender: "Female".to_string(),
            age: 25,
            hypertension: "Yes".to_string(),
            heart_disease: "Yes".to_string(),
            ever_married: "Yes".to_string(),
            work_type: "Govt_job".to_string(),
            residence_type: "Rural".to_string(),
            avg_glucose_level: 100.0,
            bmi: 25.0,
            smoking_status: "formerly smoked".to_string(),
        }
    }
}

/// Inclusive bounds the form enforces on numeric questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormBounds {
    pub age_min: u32,
    pub age_max: u32,
    pub glucose_min: f64,
    pub glucose_max: f64,
    pub bmi_min: f64,
    pub bmi_max: f64,
}

impl FormBounds {
    pub fn clamp_glucose(&self, value: f64) -> f64 {
        clamp_finite(value, self.glucose_min, self.glucose_max)
    }

    pub fn clamp_bmi(&self, value: f64) -> f64 {
        clamp_finite(value, self.bmi_min, self.bmi_max)
    }
}

impl Default for FormBounds {
    fn default() -> Self {
        Self {
            age_min: 0,
            age_max: 120,
            glucose_min: 0.0,
            glucose_max: 300.0,
            bmi_min: 0.0,
            bmi_max: 100.0,
        }
    }
}

// NaN has no place in a bounded answer; pin it to the lower bound.
fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_use_training_column_names() {
        let answers = RawAnswers::default();
        let json = serde_json::to_value(&answers).unwrap();

        assert_eq!(json["Residence_type"], "Rural");
        assert!(json.get("residence_type").is_none());
    }

    #[test]
    fn test_answers_accept_snake_case_residence() {
        let json = r#"{
            "gender": "Male", "age": 45, "hypertension": "Yes",
            "heart_disease": "No", "ever_married": "Yes", "work_type": "Private",
            "residence_type": "Urban", "avg_glucose_level": 150.0, "bmi": 28.5,
            "smoking_status": "never smoked"
        }"#;
        let answers: RawAnswers = serde_json::from_str(json).unwrap();
        assert_eq!(answers.residence_type, "Urban");
        assert_eq!(answers.age, 45);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = FormBounds::default();
        let answers = RawAnswers {
            age: 150,
            avg_glucose_level: 512.0,
            bmi: -3.0,
            ..RawAnswers::default()
        }
        .clamped(&bounds);

        assert_eq!(answers.age, 120);
        assert_eq!(answers.avg_glucose_level, 300.0);
        assert_eq!(answers.bmi, 0.0);
    }

    #[test]
    fn test_inclusive_bounds_unchanged() {
        let bounds = FormBounds::default();

        for age in [0, 120] {
            let answers = RawAnswers {
                age,
                ..RawAnswers::default()
            }
            .clamped(&bounds);
            assert_eq!(answers.age, age);
        }

        assert_eq!(bounds.clamp_glucose(300.0), 300.0);
        assert_eq!(bounds.clamp_bmi(0.0), 0.0);
        assert_eq!(bounds.clamp_bmi(f64::NAN), 0.0);
    }
}
