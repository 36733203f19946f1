//! NATS publisher for prediction responses

use crate::types::verdict::{Outcome, PredictionResponse};
use anyhow::Result;
use async_nats::{Client, Subject};
use tracing::debug;

/// Publishes responses on the reply subject of each request
#[derive(Clone)]
pub struct ResponsePublisher {
    client: Client,
}

impl ResponsePublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Publish a response to the requester
    pub async fn reply(&self, reply: Subject, response: &PredictionResponse) -> Result<()> {
        let payload = serde_json::to_vec(response)?;

        self.client.publish(reply.clone(), payload.into()).await?;

        debug!(
            request_id = %response.request_id,
            reply = ?reply,
            ok = matches!(response.outcome, Outcome::Ok { .. }),
            "Published prediction response"
        );

        Ok(())
    }
}
