//! Stroke Risk Form
//!
//! Asks the questionnaire on the terminal, sends the answers to the service
//! over NATS and prints the verdict. Falls back to in-process prediction when
//! NATS is unreachable.
//!
//! Usage: stroke_form [nats_url] [subject]

use anyhow::{Context, Result};
use std::io::Write;
use stroke_risk_service::{
    config::AppConfig,
    error::ErrorKind,
    form::{Answer, Questionnaire},
    init_logging,
    models::ArtifactLoader,
    types::Outcome,
    CategoryMappings, InferenceEngine, InputNormalizer, PredictionResponse, PredictionService,
    RawAnswers,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

/// Where answers are evaluated
enum Backend {
    Remote {
        client: async_nats::Client,
        subject: String,
    },
    Local(PredictionService),
}

impl Backend {
    async fn evaluate(&self, answers: &RawAnswers) -> Result<PredictionResponse> {
        let payload = serde_json::to_vec(answers)?;
        match self {
            Backend::Remote { client, subject } => {
                let message = client
                    .request(subject.clone(), payload.into())
                    .await
                    .context("Prediction request failed")?;
                serde_json::from_slice(&message.payload)
                    .context("Malformed prediction response")
            }
            Backend::Local(service) => Ok(service.handle(&payload)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("stroke_form", "info", "pretty")?;

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "No usable configuration, using defaults");
        AppConfig::default()
    });

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).cloned().unwrap_or_else(|| config.nats.url.clone());
    let subject = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.nats.request_subject.clone());

    let backend = match async_nats::connect(&nats_url).await {
        Ok(client) => {
            info!(nats_url = %nats_url, subject = %subject, "Connected to NATS");
            Backend::Remote { client, subject }
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Predicting locally.");
            let bundle = ArtifactLoader::new()
                .load(&config.model.bundle_path)
                .context("Cannot predict locally without a model artifact")?;
            Backend::Local(PredictionService::new(
                InputNormalizer::new(CategoryMappings::stroke()),
                InferenceEngine::new(bundle),
                config.form.clone(),
            ))
        }
    };

    let questionnaire = Questionnaire::new(&CategoryMappings::stroke(), &config.form);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Stroke Prediction App");

    loop {
        let Some(answers) = ask(&questionnaire, &mut lines).await? else {
            break;
        };

        // A failed request is reported and the form stays open
        let result = backend.evaluate(&answers).await;
        if let Err(e) = &result {
            warn!(error = %format!("{:#}", e), "Prediction unavailable");
        }
        println!("{}", report(&result));

        let Some(again) = prompt(&mut lines, "Predict again? [y/N]").await? else {
            break;
        };
        if !again.trim().eq_ignore_ascii_case("y") {
            break;
        }
    }

    Ok(())
}

/// Ask every question until a valid answer is given. `None` on end of input.
async fn ask(
    questionnaire: &Questionnaire,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Option<RawAnswers>> {
    let mut answers: Vec<Answer> = Vec::with_capacity(questionnaire.questions().len());

    for question in questionnaire.questions() {
        loop {
            let text = format!("{}\n  {}", question.prompt, question.hint());
            let Some(input) = prompt(lines, &text).await? else {
                return Ok(None);
            };
            match question.resolve(&input) {
                Ok(answer) => {
                    answers.push(answer);
                    break;
                }
                Err(e) => println!("  {}", e),
            }
        }
    }

    Ok(Some(questionnaire.assemble(&answers)?))
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    print!("{}\n> ", text);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Text shown for one evaluation, including transport failures
fn report(result: &Result<PredictionResponse>) -> String {
    match result {
        Ok(response) => render(response),
        Err(e) => format!("\nCould not get a prediction: {:#}\n", e),
    }
}

fn render(response: &PredictionResponse) -> String {
    match &response.outcome {
        Outcome::Ok { message, .. } => format!("\n{}\n", message),
        Outcome::Error { kind, message } => match kind {
            ErrorKind::UnknownCategory => format!(
                "\nThe form offered an option the model does not know: {}\n",
                message
            ),
            ErrorKind::FeatureMismatch => format!(
                "\nMismatch in feature names or order. Please debug the input data.\n{}\n",
                message
            ),
            ErrorKind::InvalidRequest => {
                format!("\nThe service could not read the answers: {}\n", message)
            }
            ErrorKind::Scaling | ErrorKind::Classification => {
                format!("\nAn error occurred: {}\n", message)
            }
        },
    }
}
