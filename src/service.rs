//! Request handling: decode answers, normalize, predict, reply.

use crate::error::{ErrorKind, PredictionError};
use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceEngine;
use crate::normalizer::InputNormalizer;
use crate::types::answers::{FormBounds, RawAnswers};
use crate::types::verdict::{PredictionResponse, Verdict};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Stateless-per-call prediction service over an immutable bundle.
pub struct PredictionService {
    normalizer: InputNormalizer,
    engine: InferenceEngine,
    bounds: FormBounds,
    metrics: Arc<ServiceMetrics>,
}

impl PredictionService {
    pub fn new(normalizer: InputNormalizer, engine: InferenceEngine, bounds: FormBounds) -> Self {
        Self {
            normalizer,
            engine,
            bounds,
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        self.metrics.clone()
    }

    /// Normalize and predict one answer set
    pub fn evaluate(&self, answers: &RawAnswers) -> Result<Verdict, PredictionError> {
        let record = self.normalizer.normalize(answers)?;
        self.engine.predict(record)
    }

    /// Handle one serialized request and build the reply.
    ///
    /// Never fails: every per-request error becomes an error response.
    pub fn handle(&self, payload: &[u8]) -> PredictionResponse {
        let start_time = Instant::now();

        let answers = match serde_json::from_slice::<RawAnswers>(payload) {
            Ok(answers) => answers.clamped(&self.bounds),
            Err(e) => {
                warn!(error = %e, "Failed to deserialize prediction request");
                self.metrics
                    .record_error(ErrorKind::InvalidRequest, start_time.elapsed());
                return PredictionResponse::error(
                    ErrorKind::InvalidRequest,
                    format!("invalid request: {}", e),
                );
            }
        };

        let result = self.evaluate(&answers);
        let processing_time = start_time.elapsed();

        match &result {
            Ok(verdict) => {
                self.metrics.record_verdict(*verdict, processing_time);
                debug!(
                    verdict = %verdict,
                    processing_time_us = processing_time.as_micros(),
                    "Prediction request handled"
                );
            }
            Err(e) => {
                self.metrics.record_error(e.kind(), processing_time);
                warn!(
                    kind = e.kind().as_str(),
                    error = %e,
                    "Prediction request failed"
                );
            }
        }

        let response = PredictionResponse::from_result(&result);
        info!(request_id = %response.request_id, "Prediction response ready");
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loader::ArtifactLoader;
    use crate::types::verdict::Outcome;
    use std::sync::atomic::Ordering;

    fn service() -> PredictionService {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/models/stroke_bundle.json");
        let bundle = ArtifactLoader::new().load(path).unwrap();
        PredictionService::new(
            InputNormalizer::default(),
            InferenceEngine::new(bundle),
            FormBounds::default(),
        )
    }

    const SCENARIO: &str = r#"{
        "gender": "Male", "age": 45, "hypertension": "Yes", "heart_disease": "No",
        "ever_married": "Yes", "work_type": "Private", "Residence_type": "Urban",
        "avg_glucose_level": 150.0, "bmi": 28.5, "smoking_status": "never smoked"
    }"#;

    #[test]
    fn test_handle_scenario() {
        let service = service();
        let response = service.handle(SCENARIO.as_bytes());

        assert_eq!(
            response.outcome,
            Outcome::Ok {
                verdict: Verdict::AtRisk,
                message: Verdict::AtRisk.message().to_string(),
            }
        );
        assert_eq!(service.metrics().at_risk.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_handle_invalid_json() {
        let service = service();
        let response = service.handle(b"{\"gender\": \"Male\"");

        match response.outcome {
            Outcome::Error { kind, .. } => assert_eq!(kind, ErrorKind::InvalidRequest),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_handle_unknown_category_then_recover() {
        let service = service();
        let bad = SCENARIO.replace("\"Private\"", "\"Astronaut\"");

        let response = service.handle(bad.as_bytes());
        match response.outcome {
            Outcome::Error { kind, message } => {
                assert_eq!(kind, ErrorKind::UnknownCategory);
                assert!(message.contains("Astronaut"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        // The next submission is served normally
        let response = service.handle(SCENARIO.as_bytes());
        assert!(matches!(response.outcome, Outcome::Ok { .. }));
        assert_eq!(service.metrics().error_count(), 1);
    }

    #[test]
    fn test_handle_clamps_out_of_range_numbers() {
        let service = service();
        let request = SCENARIO.replace("\"age\": 45", "\"age\": 400");

        // Clamped to 120 rather than rejected
        let response = service.handle(request.as_bytes());
        assert!(matches!(response.outcome, Outcome::Ok { .. }));
    }

    #[test]
    fn test_evaluate_boundary_ages() {
        let service = service();
        for age in [0, 120] {
            let answers = RawAnswers {
                age,
                ..RawAnswers::default()
            };
            assert!(service.evaluate(&answers).is_ok());
        }
    }
}
