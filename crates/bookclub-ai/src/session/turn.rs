//! Turn execution: one user input, one assistant reply.

use tracing::{debug, warn};

use crate::speech::{transcript_or_notice, SpeechToText};
use crate::translate::Translator;
use crate::{AiError, CompletionClient, Message};

use super::manager::ChatSession;
use super::types::BusyGuard;

/// Fixed reply substituted for any completion-service failure. Must stay
/// byte-identical: the surface and exports show it verbatim.
pub const COMPLETION_FAILURE_REPLY: &str = "Error communicating with Groq API.";

impl ChatSession {
    /// Run one turn: append the user's text, get the assistant's reply,
    /// append it, and return it.
    ///
    /// Empty (or whitespace-only) input is a no-op and returns `Ok(None)`
    /// without touching the log or calling any collaborator. Collaborator
    /// failures never escape: a completion failure becomes the fixed
    /// [`COMPLETION_FAILURE_REPLY`] literal and a translation failure
    /// becomes an annotation on the reply. The only `Err` is the busy
    /// guard rejecting an overlapping turn.
    pub async fn handle_input(
        &mut self,
        completion: &dyn CompletionClient,
        translator: &dyn Translator,
        input: impl Into<String>,
    ) -> Result<Option<String>, AiError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Ok(None);
        }

        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(Message::user(input));

        let reply = match completion.complete(&self.messages).await {
            Ok(content) => {
                let reply = if self.translate_to_urdu {
                    self.annotate_with_urdu(translator, content).await
                } else {
                    content
                };
                self.last_response = Some(reply.clone());
                reply
            }
            Err(e) => {
                warn!(error = %e, "completion request failed");
                self.last_response = Some(COMPLETION_FAILURE_REPLY.to_string());
                COMPLETION_FAILURE_REPLY.to_string()
            }
        };

        self.messages.push(Message::assistant(reply.clone()));
        debug!(log_len = self.messages.len(), "turn complete");

        Ok(Some(reply))
    }

    /// Run one voice turn from an uploaded WAV recording.
    ///
    /// No upload means no turn. A recognition failure is surfaced as the
    /// turn's input text, not as an error, so the conversation continues.
    pub async fn handle_voice_upload(
        &mut self,
        completion: &dyn CompletionClient,
        translator: &dyn Translator,
        speech: &dyn SpeechToText,
        audio_wav: Option<Vec<u8>>,
    ) -> Result<Option<String>, AiError> {
        let Some(audio) = audio_wav else {
            return Ok(None);
        };

        let transcript = transcript_or_notice(speech.recognize(audio).await);
        self.handle_input(completion, translator, transcript).await
    }

    /// Append the Urdu rendering of `reply`, or a failure annotation if
    /// translation fails. Translation never aborts the turn.
    async fn annotate_with_urdu(&self, translator: &dyn Translator, reply: String) -> String {
        match translator.translate(&reply, "ur").await {
            Ok(translated) => format!("{reply}\n\n (Translated to Urdu):\n{translated}"),
            Err(e) => {
                warn!(error = %e, "Urdu translation failed");
                format!("{reply}\n\nUrdu translation failed: {e}")
            }
        }
    }
}
