//! CompletionClient trait implementation for GroqClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiError, CompletionClient, Message};

use super::client::{GroqClient, GROQ_API_URL};

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError> {
        let body = self.build_request_body(messages);

        debug!(model = %self.config.model, turns = messages.len(), "Groq API request");

        let response = self
            .http
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }
}
