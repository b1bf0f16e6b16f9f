//! Signal HTTP client.

use crate::error::SignalError;
use crate::types::*;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Signal CLI REST API client bound to one registered account.
#[derive(Clone)]
pub struct SignalClient {
    client: Client,
    base_url: String,
    phone_number: String,
}

impl SignalClient {
    /// Create a new Signal client.
    pub fn new(
        base_url: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            phone_number: phone_number.into(),
        })
    }

    /// The account this client sends and receives as.
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Check if the Signal API is healthy.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Receive pending messages for the account.
    #[instrument(skip(self))]
    pub async fn receive(&self) -> Result<Vec<IncomingMessage>, SignalError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/receive/{}",
                self.base_url,
                encode(&self.phone_number)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::Api(error_body(response).await));
        }

        let messages: Vec<IncomingMessage> = response.json().await?;
        debug!("Received {} messages", messages.len());
        Ok(messages)
    }

    /// Send a text message to a recipient number or group ID.
    #[instrument(skip(self, message), fields(len = message.len()))]
    pub async fn send(&self, recipient: &str, message: &str) -> Result<(), SignalError> {
        let request = SendMessageRequest {
            message: message.to_string(),
            number: self.phone_number.clone(),
            recipients: vec![recipient.to_string()],
        };

        let response = self
            .client
            .post(format!("{}/v2/send", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = error_body(response).await;
            warn!("Send failed: {}", msg);
            return Err(SignalError::SendFailed(msg));
        }

        debug!("Sent message to {}", recipient);
        Ok(())
    }

    /// Mark a received message as read.
    #[instrument(skip(self, message), fields(sender = %message.sender_id))]
    pub async fn send_read_receipt(&self, message: &RoomMessage) -> Result<(), SignalError> {
        let request = ReceiptRequest {
            receipt_type: "read".into(),
            recipient: message.sender_id.clone(),
            timestamp: message.timestamp,
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/receipts/{}",
                self.base_url,
                encode(&self.phone_number)
            ))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::ReceiptFailed(error_body(response).await));
        }

        Ok(())
    }
}

async fn error_body(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        status.to_string()
    } else {
        body
    }
}
