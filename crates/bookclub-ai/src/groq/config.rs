//! Groq API client configuration.

use std::fmt;

use crate::AiError;

/// Groq API client configuration.
#[derive(Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
}

impl fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.6,
        }
    }

    /// Create config from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, AiError> {
        match std::env::var("GROQ_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(AiError::ApiError(
                "Groq API not configured. Set GROQ_API_KEY in the environment or a .env file."
                    .into(),
            )),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
