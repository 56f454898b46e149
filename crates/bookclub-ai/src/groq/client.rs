//! Groq API client struct, request building, and response parsing.

use crate::{AiError, Message};

use super::config::GroqConfig;

pub(crate) const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq chat-completions client.
pub struct GroqClient {
    pub(crate) config: GroqConfig,
    pub(crate) http: reqwest::Client,
}

impl GroqClient {
    pub fn new(config: GroqConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Build the JSON request body for the chat completions API.
    /// Messages are sent verbatim, in order, system message included.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let msgs: Vec<_> = messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role,
                    "content": msg.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
            "temperature": self.config.temperature,
        })
    }

    /// Extract the first completion choice's message content.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("no completion choice in response".to_string()))
    }
}
