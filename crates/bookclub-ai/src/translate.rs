//! Translation collaborator for the Urdu reply option.
//!
//! Speaks the public Google translate endpoint (the `gtx` client): one GET
//! per translation, response is a nested segment array whose first level
//! carries `[translated, original, ...]` pairs.

use async_trait::async_trait;
use tracing::debug;

use crate::AiError;

const TRANSLATE_API_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Translation collaborator.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the ISO-639 target language code (`"ur"` for Urdu).
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AiError>;
}

/// Translation client configuration.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// Source language code, `"auto"` to let the service detect it.
    pub source_lang: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            source_lang: "auto".to_string(),
        }
    }
}

/// Client for the unauthenticated `gtx` translate endpoint.
pub struct GtxTranslateClient {
    config: TranslateConfig,
    http: reqwest::Client,
}

impl GtxTranslateClient {
    pub fn new(config: TranslateConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Concatenate the translated segments from the nested-array response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        let segments = json
            .get(0)
            .and_then(|s| s.as_array())
            .ok_or_else(|| AiError::ParseError("no translation segments".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(text) = segment.get(0).and_then(|t| t.as_str()) {
                translated.push_str(text);
            }
        }

        if translated.is_empty() {
            return Err(AiError::ParseError("empty translation".to_string()));
        }
        Ok(translated)
    }
}

impl Default for GtxTranslateClient {
    fn default() -> Self {
        Self::new(TranslateConfig::default())
    }
}

#[async_trait]
impl Translator for GtxTranslateClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AiError> {
        debug!(target = target_lang, chars = text.len(), "translation request");

        let response = self
            .http
            .get(TRANSLATE_API_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", self.config.source_lang.as_str()),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
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
