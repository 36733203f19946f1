//! Stroke Risk Service - Main Entry Point
//!
//! Loads the model artifact, then answers prediction requests from NATS one
//! at a time.

use anyhow::{Context, Result};
use futures::StreamExt;
use stroke_risk_service::{
    config::AppConfig, consumer::RequestConsumer, init_logging, models::ArtifactLoader,
    producer::ResponsePublisher, service::PredictionService, CategoryMappings, InferenceEngine,
    InputNormalizer, LIBRARY_TARGET,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let logging = &config.logging;
    init_logging(LIBRARY_TARGET, &logging.level, &logging.format)?;
    info!("Starting Stroke Risk Service");

    // A bad artifact is fatal: never serve without a valid bundle
    let bundle = match ArtifactLoader::new().load(&config.model.bundle_path) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!(error = %e, "Failed to load model artifact");
            return Err(e).context("Cannot serve predictions without a model artifact");
        }
    };
    let features = bundle.feature_names().len();
    let engine = InferenceEngine::new(bundle);
    info!(features, classifier = engine.model_name(), "Model bundle ready");

    let normalizer = InputNormalizer::new(CategoryMappings::stroke());
    let service = PredictionService::new(normalizer, engine, config.form.clone());
    let metrics = service.metrics();

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let publisher = ResponsePublisher::new(client.clone());
    let mut subscription = consumer.subscribe().await?;

    info!(subject = consumer.subject(), "Waiting for prediction requests");

    loop {
        tokio::select! {
            message = subscription.next() => {
                let Some(message) = message else {
                    warn!("Request subscription closed");
                    break;
                };

                let response = service.handle(&message.payload);

                match message.reply {
                    Some(reply) => {
                        if let Err(e) = publisher.reply(reply, &response).await {
                            error!(
                                request_id = %response.request_id,
                                error = %e,
                                "Failed to publish prediction response"
                            );
                        }
                    }
                    None => {
                        warn!(
                            request_id = %response.request_id,
                            outcome = ?response.outcome,
                            "Request had no reply subject, response dropped"
                        );
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Stroke Risk Service shutting down...");
    metrics.print_summary();

    Ok(())
}
