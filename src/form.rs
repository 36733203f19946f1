//! Terminal questionnaire that collects answers within the offered options.
//!
//! Choice questions only accept labels from their category table and numeric
//! questions clamp to the configured bounds, so the answer set handed to the
//! normalizer always respects the form contract.

use crate::categories::{CategoryMapping, CategoryMappings};
use crate::types::answers::{FormBounds, RawAnswers};
use thiserror::Error;

/// Errors raised while interpreting a typed answer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("`{input}` is not one of: {options}")]
    InvalidChoice { input: String, options: String },

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("expected {expected} answers, got {actual}")]
    Incomplete { expected: usize, actual: usize },

    #[error("answer to \"{question}\" must be {expected}")]
    WrongAnswerKind {
        question: &'static str,
        expected: &'static str,
    },
}

/// Accepted answer to one question
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Label(String),
    Integer(u32),
    Decimal(f64),
}

#[derive(Debug, Clone)]
pub enum QuestionKind {
    Choice(Vec<String>),
    Integer { min: u32, max: u32, default: u32 },
    Decimal { min: f64, max: f64, default: f64 },
}

#[derive(Debug, Clone)]
pub struct Question {
    pub prompt: &'static str,
    pub kind: QuestionKind,
}

impl Question {
    fn choice(prompt: &'static str, mapping: &CategoryMapping) -> Self {
        Self {
            prompt,
            kind: QuestionKind::Choice(mapping.labels().iter().map(|l| l.to_string()).collect()),
        }
    }

    /// Interpret one line of input.
    ///
    /// Empty input takes the default (first option, or the numeric default).
    pub fn resolve(&self, input: &str) -> Result<Answer, FormError> {
        let input = input.trim();

        match &self.kind {
            QuestionKind::Choice(options) => {
                if input.is_empty() {
                    return Ok(Answer::Label(options[0].clone()));
                }
                if let Some(option) = options.iter().find(|o| o.as_str() == input) {
                    return Ok(Answer::Label(option.clone()));
                }
                // 1-based option number
                input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                    .map(|o| Answer::Label(o.clone()))
                    .ok_or_else(|| FormError::InvalidChoice {
                        input: input.to_string(),
                        options: options.join(", "),
                    })
            }
            QuestionKind::Integer { min, max, default } => {
                if input.is_empty() {
                    return Ok(Answer::Integer(*default));
                }
                let value: i64 = input
                    .parse()
                    .map_err(|_| FormError::NotANumber(input.to_string()))?;
                Ok(Answer::Integer(value.clamp(*min as i64, *max as i64) as u32))
            }
            QuestionKind::Decimal { min, max, default } => {
                if input.is_empty() {
                    return Ok(Answer::Decimal(*default));
                }
                let value: f64 = input
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| FormError::NotANumber(input.to_string()))?;
                Ok(Answer::Decimal(value.clamp(*min, *max)))
            }
        }
    }

    /// Description of the answer this question takes
    fn expected(&self) -> &'static str {
        match self.kind {
            QuestionKind::Choice(_) => "one of the offered options",
            QuestionKind::Integer { .. } => "a whole number",
            QuestionKind::Decimal { .. } => "a decimal number",
        }
    }

    fn wrong_kind(&self) -> FormError {
        FormError::WrongAnswerKind {
            question: self.prompt,
            expected: self.expected(),
        }
    }

    fn expect_label(&self, answer: &Answer) -> Result<String, FormError> {
        match (&self.kind, answer) {
            (QuestionKind::Choice(options), Answer::Label(label)) => {
                if options.contains(label) {
                    Ok(label.clone())
                } else {
                    Err(FormError::InvalidChoice {
                        input: label.clone(),
                        options: options.join(", "),
                    })
                }
            }
            _ => Err(self.wrong_kind()),
        }
    }

    fn expect_integer(&self, answer: &Answer) -> Result<u32, FormError> {
        match (&self.kind, answer) {
            (QuestionKind::Integer { .. }, Answer::Integer(v)) => Ok(*v),
            _ => Err(self.wrong_kind()),
        }
    }

    fn expect_decimal(&self, answer: &Answer) -> Result<f64, FormError> {
        match (&self.kind, answer) {
            (QuestionKind::Decimal { .. }, Answer::Decimal(v)) => Ok(*v),
            _ => Err(self.wrong_kind()),
        }
    }

    /// Options line shown under the prompt
    pub fn hint(&self) -> String {
        match &self.kind {
            QuestionKind::Choice(options) => options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{}) {}", i + 1, o))
                .collect::<Vec<_>>()
                .join("  "),
            QuestionKind::Integer { min, max, default } => {
                format!("{}-{} [{}]", min, max, default)
            }
            QuestionKind::Decimal { min, max, default } => {
                format!("{:.1}-{:.1} [{:.1}]", min, max, default)
            }
        }
    }
}

/// The ten stroke questions in presentation order
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(mappings: &CategoryMappings, bounds: &FormBounds) -> Self {
        let questions = vec![
            Question::choice("Choose your gender:", &mappings.gender),
            Question {
                prompt: "Input your age",
                kind: QuestionKind::Integer {
                    min: bounds.age_min,
                    max: bounds.age_max,
                    default: 25,
                },
            },
            Question::choice("Do you have hypertension?", &mappings.yes_no),
            Question::choice("Do you have heart disease?", &mappings.yes_no),
            Question::choice("Have you ever married?", &mappings.ever_married),
            Question::choice("What is your work type?", &mappings.work_type),
            Question::choice("What is your residence type?", &mappings.residence_type),
            Question {
                prompt: "Input your average glucose level",
                kind: QuestionKind::Decimal {
                    min: bounds.glucose_min,
                    max: bounds.glucose_max,
                    default: 100.0,
                },
            },
            Question {
                prompt: "Input your BMI",
                kind: QuestionKind::Decimal {
                    min: bounds.bmi_min,
                    max: bounds.bmi_max,
                    default: 25.0,
                },
            },
            Question::choice("What is your smoking status?", &mappings.smoking_status),
        ];

        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Build the answer set from one accepted answer per question, in order
    pub fn assemble(&self, answers: &[Answer]) -> Result<RawAnswers, FormError> {
        if answers.len() != self.questions.len() {
            return Err(FormError::Incomplete {
                expected: self.questions.len(),
                actual: answers.len(),
            });
        }

        let q = &self.questions;
        Ok(RawAnswers {
            gender: q[0].expect_label(&answers[0])?,
            age: q[1].expect_integer(&answers[1])?,
            hypertension: q[2].expect_label(&answers[2])?,
            heart_disease: q[3].expect_label(&answers[3])?,
            ever_married: q[4].expect_label(&answers[4])?,
            work_type: q[5].expect_label(&answers[5])?,
            residence_type: q[6].expect_label(&answers[6])?,
            avg_glucose_level: q[7].expect_decimal(&answers[7])?,
            bmi: q[8].expect_decimal(&answers[8])?,
            smoking_status: q[9].expect_label(&answers[9])?,
        })
    }
}
