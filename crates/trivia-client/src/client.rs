//! Open Trivia DB HTTP client.

use crate::error::{describe_response_code, TriviaError};
use crate::types::*;
use crate::QuestionProvider;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the Open Trivia Database (<https://opentdb.com>).
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
}

impl OpenTdbClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TriviaError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a set of questions matching the query.
    ///
    /// Fails with [`TriviaError::Rejected`] when the API answers with a
    /// non-zero response code.
    #[instrument(skip(self), fields(amount = query.amount))]
    pub async fn fetch(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError> {
        let response = self
            .client
            .get(format!("{}/api.php", self.base_url))
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            warn!("Trivia API returned {}", status);
            return Err(TriviaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        debug!("Response body: {}", body.chars().take(200).collect::<String>());
        let parsed: ApiResponse = serde_json::from_str(&body)?;

        if parsed.response_code != 0 {
            return Err(TriviaError::Rejected {
                code: parsed.response_code,
                reason: describe_response_code(parsed.response_code),
            });
        }

        parsed.results.into_iter().map(Question::decoded).collect()
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbClient {
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError> {
        self.fetch(query).await
    }

    fn describe(&self, query: &QuestionQuery) -> String {
        let params = query
            .params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/api.php?{}", self.base_url, params)
    }
}
