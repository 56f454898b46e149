//! Speech-to-text collaborator for voice input.
//!
//! Voice turns upload a WAV recording; the transcript (or a readable
//! failure notice) becomes the turn's input text. Recognition failures
//! are never fatal — see [`transcript_or_notice`].

use async_trait::async_trait;
use tracing::debug;

const TRANSCRIPTION_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Speech recognition failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The audio was valid but no speech could be recognized in it.
    #[error("could not understand the audio")]
    Unrecognized,
    /// The recognition service rejected or failed the request.
    #[error("speech service error: {0}")]
    Service(String),
    #[error("{0}")]
    Other(String),
}

/// Speech-to-text collaborator. Input is a complete WAV recording.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn recognize(&self, audio_wav: Vec<u8>) -> Result<String, SpeechError>;
}

/// Convert a recognition outcome into the text a voice turn runs with.
///
/// Failures become fixed human-readable notices that flow into the
/// conversation as if they had been spoken, so a bad upload produces a
/// normal turn instead of an error state.
pub fn transcript_or_notice(outcome: Result<String, SpeechError>) -> String {
    match outcome {
        Ok(text) => text,
        Err(SpeechError::Unrecognized) => "Sorry, I couldn't understand the audio.".to_string(),
        Err(SpeechError::Service(detail)) => format!("Speech recognition API error: {detail}"),
        Err(SpeechError::Other(detail)) => format!("Unexpected error: {detail}"),
    }
}

/// Whisper API client configuration.
#[derive(Clone)]
pub struct WhisperConfig {
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
}

impl std::fmt::Debug for WhisperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl WhisperConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "whisper-1".to_string(),
            language: None,
        }
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }
}

/// Whisper-backed speech-to-text client.
pub struct WhisperClient {
    config: WhisperConfig,
    http: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl SpeechToText for WhisperClient {
    async fn recognize(&self, audio_wav: Vec<u8>) -> Result<String, SpeechError> {
        debug!(
            model = %self.config.model,
            size = audio_wav.len(),
            "transcription request"
        );

        let file_part = reqwest::multipart::Part::bytes(audio_wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::Other(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone());

        if let Some(ref lang) = self.config.language {
            form = form.text("language", lang.clone());
        }

        let response = self
            .http
            .post(TRANSCRIPTION_API_URL)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SpeechError::Service(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SpeechError::Other(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or_else(|| SpeechError::Other("no 'text' field in response".to_string()))?;

        // An empty transcript means nothing intelligible was spoken.
        if text.trim().is_empty() {
            return Err(SpeechError::Unrecognized);
        }

        Ok(text.to_string())
    }
}
