//! Input normalization for stroke model inference.
//!
//! Turns raw form answers into a feature record keyed by the column names
//! used during training. Column order is left to the predictor.

use crate::categories::CategoryMappings;
use crate::error::PredictionError;
use crate::types::answers::RawAnswers;
use crate::types::features::FeatureRecord;

/// Training column names produced from a questionnaire
pub const FEATURE_COLUMNS: [&str; 10] = [
    "gender",
    "age",
    "hypertension",
    "heart_disease",
    "ever_married",
    "work_type",
    "Residence_type",
    "avg_glucose_level",
    "bmi",
    "smoking_status",
];

/// Normalizer that encodes categorical answers with fixed tables.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    mappings: CategoryMappings,
}

impl InputNormalizer {
    pub fn new(mappings: CategoryMappings) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &CategoryMappings {
        &self.mappings
    }

    /// Encode one answer set into a feature record.
    pub fn normalize(&self, answers: &RawAnswers) -> Result<FeatureRecord, PredictionError> {
        normalize(answers, &self.mappings)
    }
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new(CategoryMappings::stroke())
    }
}

/// Encode one answer set into a feature record.
///
/// Categorical labels go through their tables; numeric answers pass through
/// unchanged since the form has already bounded them.
pub fn normalize(
    answers: &RawAnswers,
    mappings: &CategoryMappings,
) -> Result<FeatureRecord, PredictionError> {
    let mut record = FeatureRecord::new();

    record.insert("gender", mappings.gender.encode(&answers.gender)? as f64);
    record.insert("age", answers.age as f64);
    record.insert(
        "hypertension",
        encode_yes_no(mappings, "hypertension", &answers.hypertension)? as f64,
    );
    record.insert(
        "heart_disease",
        encode_yes_no(mappings, "heart_disease", &answers.heart_disease)? as f64,
    );
    record.insert(
        "ever_married",
        mappings.ever_married.encode(&answers.ever_married)? as f64,
    );
    record.insert("work_type", mappings.work_type.encode(&answers.work_type)? as f64);
    record.insert(
        "Residence_type",
        mappings.residence_type.encode(&answers.residence_type)? as f64,
    );
    record.insert("avg_glucose_level", answers.avg_glucose_level);
    record.insert("bmi", answers.bmi);
    record.insert(
        "smoking_status",
        mappings.smoking_status.encode(&answers.smoking_status)? as f64,
    );

    Ok(record)
}

// The yes/no table is shared, so report the actual question on failure.
fn encode_yes_no(
    mappings: &CategoryMappings,
    question: &str,
    label: &str,
) -> Result<i64, PredictionError> {
    mappings
        .yes_no
        .code(label)
        .ok_or_else(|| PredictionError::UnknownCategory {
            question: question.to_string(),
            label: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> RawAnswers {
        RawAnswers {
            gender: "Male".to_string(),
            age: 45,
            hypertension: "Yes".to_string(),
            heart_disease: "No".to_string(),
            ever_married: "Yes".to_string(),
            work_type: "Private".to_string(),
            residence_type: "Urban".to_string(),
            avg_glucose_level: 150.0,
            bmi: 28.5,
            smoking_status: "never smoked".to_string(),
        }
    }

    #[test]
    fn test_scenario_encoding() {
        let record = InputNormalizer::default().normalize(&scenario()).unwrap();

        let expected = [
            ("gender", 1.0),
            ("age", 45.0),
            ("hypertension", 1.0),
            ("heart_disease", 0.0),
            ("ever_married", 1.0),
            ("work_type", 1.0),
            ("Residence_type", 1.0),
            ("avg_glucose_level", 150.0),
            ("bmi", 28.5),
            ("smoking_status", 1.0),
        ];
        assert_eq!(record.len(), expected.len());
        for (name, value) in expected {
            assert_eq!(record.get(name), Some(value), "{}", name);
        }
    }

    #[test]
    fn test_record_keys_match_columns() {
        let record = InputNormalizer::default()
            .normalize(&RawAnswers::default())
            .unwrap();
        for column in FEATURE_COLUMNS {
            assert!(record.contains(column), "{}", column);
        }
    }

    #[test]
    fn test_age_bounds_accepted() {
        let normalizer = InputNormalizer::default();
        for age in [0, 120] {
            let answers = RawAnswers {
                age,
                ..scenario()
            };
            let record = normalizer.normalize(&answers).unwrap();
            assert_eq!(record.get("age"), Some(age as f64));
        }
    }

    #[test]
    fn test_numeric_answers_pass_through() {
        // Range enforcement belongs to the form
        let answers = RawAnswers {
            avg_glucose_level: 412.0,
            bmi: 0.0,
            ..scenario()
        };
        let record = InputNormalizer::default().normalize(&answers).unwrap();

        assert_eq!(record.get("avg_glucose_level"), Some(412.0));
        assert_eq!(record.get("bmi"), Some(0.0));
    }

    #[test]
    fn test_unknown_category() {
        let normalizer = InputNormalizer::default();

        let answers = RawAnswers {
            work_type: "Never_worked".to_string(),
            ..scenario()
        };
        assert_eq!(
            normalizer.normalize(&answers).unwrap_err(),
            PredictionError::UnknownCategory {
                question: "work_type".to_string(),
                label: "Never_worked".to_string(),
            }
        );

        let answers = RawAnswers {
            heart_disease: "Maybe".to_string(),
            ..scenario()
        };
        assert_eq!(
            normalizer.normalize(&answers).unwrap_err(),
            PredictionError::UnknownCategory {
                question: "heart_disease".to_string(),
                label: "Maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_every_offered_label_normalizes() {
        let normalizer = InputNormalizer::default();
        let mappings = normalizer.mappings().clone();

        for gender in mappings.gender.labels() {
            for work_type in mappings.work_type.labels() {
                for smoking in mappings.smoking_status.labels() {
                    let answers = RawAnswers {
                        gender: gender.to_string(),
                        work_type: work_type.to_string(),
                        smoking_status: smoking.to_string(),
                        ..scenario()
                    };
                    assert!(normalizer.normalize(&answers).is_ok());
                }
            }
        }
    }
}
