//! Fixed label-to-code tables for the categorical questions.
//!
//! Codes match the integer encoding used when the classifier was trained.
//! Tables are built once and handed to the normalizer and the form explicitly.

use crate::error::PredictionError;

/// Ordered mapping from the labels offered for one question to their codes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMapping {
    question: &'static str,
    entries: Vec<(String, i64)>,
}

impl CategoryMapping {
    /// Create a mapping. Entry order is the order options are presented in.
    pub fn new(question: &'static str, entries: &[(&str, i64)]) -> Self {
        Self {
            question,
            entries: entries
                .iter()
                .map(|(label, code)| (label.to_string(), *code))
                .collect(),
        }
    }

    /// Question this table belongs to
    pub fn question(&self) -> &'static str {
        self.question
    }

    /// Look up the code for a label
    pub fn code(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, code)| *code)
    }

    /// Labels in presentation order
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Encode a label, failing if it is not one of the offered options.
    pub fn encode(&self, label: &str) -> Result<i64, PredictionError> {
        self.code(label)
            .ok_or_else(|| PredictionError::UnknownCategory {
                question: self.question.to_string(),
                label: label.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All categorical tables used by the stroke questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMappings {
    pub gender: CategoryMapping,
    pub ever_married: CategoryMapping,
    pub work_type: CategoryMapping,
    pub residence_type: CategoryMapping,
    pub smoking_status: CategoryMapping,
    /// Shared by the hypertension and heart disease questions
    pub yes_no: CategoryMapping,
}

impl CategoryMappings {
    /// Tables matching the training encoding.
    pub fn stroke() -> Self {
        Self {
            gender: CategoryMapping::new("gender", &[("Female", 0), ("Male", 1)]),
            ever_married: CategoryMapping::new("ever_married", &[("Yes", 1), ("No", 0)]),
            work_type: CategoryMapping::new(
                "work_type",
                &[
                    ("Govt_job", 0),
                    ("Private", 1),
                    ("Self-employed", 2),
                    ("children", 3),
                ],
            ),
            residence_type: CategoryMapping::new(
                "Residence_type",
                &[("Rural", 0), ("Urban", 1)],
            ),
            smoking_status: CategoryMapping::new(
                "smoking_status",
                &[
                    ("formerly smoked", 0),
                    ("never smoked", 1),
                    ("smokes", 2),
                    ("Unknown", 3),
                ],
            ),
            yes_no: CategoryMapping::new("yes/no", &[("Yes", 1), ("No", 0)]),
        }
    }
}

impl Default for CategoryMappings {
    fn default() -> Self {
        Self::stroke()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_codes() {
        let mappings = CategoryMappings::stroke();

        assert_eq!(mappings.gender.code("Male"), Some(1));
        assert_eq!(mappings.ever_married.code("No"), Some(0));
        assert_eq!(mappings.work_type.code("children"), Some(3));
        assert_eq!(mappings.residence_type.code("Urban"), Some(1));
        assert_eq!(mappings.smoking_status.code("Unknown"), Some(3));
        assert_eq!(mappings.yes_no.code("Yes"), Some(1));
    }

    #[test]
    fn test_labels_keep_presentation_order() {
        let mappings = CategoryMappings::stroke();
        assert_eq!(
            mappings.work_type.labels(),
            vec!["Govt_job", "Private", "Self-employed", "children"]
        );
        assert_eq!(mappings.ever_married.labels(), vec!["Yes", "No"]);
    }

    #[test]
    fn test_encode_unknown_label() {
        let mappings = CategoryMappings::stroke();

        // Labels are case sensitive
        let err = mappings.smoking_status.encode("Never Smoked").unwrap_err();
        assert_eq!(
            err,
            PredictionError::UnknownCategory {
                question: "smoking_status".to_string(),
                label: "Never Smoked".to_string(),
            }
        );
    }

    #[test]
    fn test_every_label_encodes() {
        let mappings = CategoryMappings::stroke();
        for mapping in [
            &mappings.gender,
            &mappings.ever_married,
            &mappings.work_type,
            &mappings.residence_type,
            &mappings.smoking_status,
            &mappings.yes_no,
        ] {
            for label in mapping.labels() {
                let question = mapping.question();
                assert!(mapping.encode(label).is_ok(), "{} / {}", question, label);
            }
        }
    }
}
