//! Task modes and concurrency guards.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::AiError;

/// Base instruction shared by every task mode.
const BASE_INSTRUCTION: &str = "You are a helpful AI for book clubs. Provide clear, concise, \
     and friendly support on books, and no longer than 3-4 lines";

/// The assistant persona for a session, selected once and fixed for the
/// session's lifetime. Determines the task-specific suffix of the system
/// message and whether input arrives as text or a voice recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TaskMode {
    SummarizeChapter,
    TranslateExplainQuote,
    DiscussionQuestions,
    RecapCharactersThemes,
    VoiceInput,
}

impl TaskMode {
    pub const ALL: [TaskMode; 5] = [
        TaskMode::SummarizeChapter,
        TaskMode::TranslateExplainQuote,
        TaskMode::DiscussionQuestions,
        TaskMode::RecapCharactersThemes,
        TaskMode::VoiceInput,
    ];

    /// Selector label shown on the interactive surface.
    pub fn label(&self) -> &'static str {
        match self {
            TaskMode::SummarizeChapter => "Summarize Chapter",
            TaskMode::TranslateExplainQuote => "Translate & Explain Quote",
            TaskMode::DiscussionQuestions => "Generate Discussion Questions",
            TaskMode::RecapCharactersThemes => "Recap Characters & Themes",
            TaskMode::VoiceInput => "Voice-to-Text Input",
        }
    }

    /// Task-specific suffix appended to the base instruction.
    fn prompt_suffix(&self) -> &'static str {
        match self {
            TaskMode::SummarizeChapter => " Summarize the given book chapter briefly and clearly.",
            TaskMode::TranslateExplainQuote => {
                " Translate the quote to English and explain its meaning simply."
            }
            TaskMode::DiscussionQuestions => {
                " Create thoughtful, discussion-worthy questions from the given text."
            }
            TaskMode::RecapCharactersThemes => {
                " Recap important characters and central themes from the given chapter or book."
            }
            TaskMode::VoiceInput => " Transcribe the audio and answer based on the spoken input.",
        }
    }

    /// Full system message content for a new session in this mode.
    pub fn system_prompt(&self) -> String {
        format!("{BASE_INSTRUCTION}{}", self.prompt_suffix())
    }

    /// Whether input arrives as an uploaded voice recording.
    pub fn is_voice(&self) -> bool {
        matches!(self, TaskMode::VoiceInput)
    }
}

impl std::fmt::Display for TaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskMode {
    type Err = String;

    /// Parse a selector label. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TaskMode::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown task mode: {wanted}"))
    }
}

/// Guard that clears the `busy` flag on drop, ensuring it is always
/// released even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `Err` if already busy.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::ApiError(
                "Session is busy with another request".into(),
            ));
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
