//! Conversation engine for the book club companion.
//!
//! Provides the Groq chat-completion client, speech-to-text and
//! translation collaborators, and the session manager that owns the
//! conversation log and runs one turn at a time. Every collaborator
//! failure is absorbed inside the turn and surfaced as ordinary reply
//! text, so callers never have to unwind a half-finished turn.

pub mod export;
pub mod groq;
pub mod session;
pub mod speech;
pub mod translate;

use async_trait::async_trait;

pub use export::{export_last_response, export_transcript, ExportError};
pub use groq::{GroqClient, GroqConfig};
pub use session::{ChatSession, TaskMode, COMPLETION_FAILURE_REPLY};
pub use speech::{transcript_or_notice, SpeechError, SpeechToText, WhisperClient, WhisperConfig};
pub use translate::{GtxTranslateClient, TranslateConfig, Translator};

/// Chat-completion collaborator. Receives the full ordered conversation
/// log (system message included) and returns the assistant's reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Capitalized label used in exported transcripts.
    pub fn capitalized(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
