//! Stroke Risk Service Library
//!
//! Encodes questionnaire answers into the feature layout a pre-trained
//! classifier expects, and turns its label into a risk verdict.

pub mod categories;
pub mod config;
pub mod consumer;
pub mod error;
pub mod form;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod producer;
pub mod service;
pub mod types;

pub use categories::CategoryMappings;
pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{ArtifactError, ErrorKind, PredictionError};
pub use models::{ArtifactLoader, InferenceEngine, ModelBundle};
pub use normalizer::InputNormalizer;
pub use producer::ResponsePublisher;
pub use service::PredictionService;
pub use types::{PredictionResponse, RawAnswers, Verdict};

use tracing_subscriber::EnvFilter;

/// Tracing target of this library
pub const LIBRARY_TARGET: &str = "stroke_risk_service";

/// Default filter for a binary: its own target at `level`, plus this
/// library's warnings when the binary is a different crate.
pub fn log_filter(crate_name: &str, level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = format!("{}={}", crate_name, level);
    if crate_name != LIBRARY_TARGET {
        directives.push_str(&format!(",{}=warn", LIBRARY_TARGET));
    }
    Ok(EnvFilter::try_new(directives)?)
}

/// Install the global tracing subscriber.
///
/// A set `RUST_LOG` replaces the default filter; `format` is "json" or
/// anything else for human-readable output.
pub fn init_logging(crate_name: &str, level: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| log_filter(crate_name, level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_filter_keeps_library_warnings() {
        let filter = log_filter("stroke_form", "info").unwrap().to_string();

        assert!(filter.contains("stroke_form=info"));
        assert!(filter.contains("stroke_risk_service=warn"));
    }

    #[test]
    fn test_service_filter() {
        let filter = log_filter(LIBRARY_TARGET, "debug").unwrap().to_string();
        assert_eq!(filter, "stroke_risk_service=debug");
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(log_filter("stroke_form", "loud").is_err());
    }
}
