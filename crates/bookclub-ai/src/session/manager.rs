//! ChatSession struct and conversation log accessors.

use std::sync::atomic::AtomicBool;

use crate::{Message, Role};

use super::types::TaskMode;

/// One user's conversation session.
///
/// The log always starts with exactly one system message built from the
/// selected task mode, and roles strictly alternate user/assistant after
/// it. Created on first interaction, dropped at session end; never shared
/// across sessions.
pub struct ChatSession {
    /// Ordered conversation log, sent verbatim to the completion service.
    pub(super) messages: Vec<Message>,
    /// Assistant persona, fixed for the session's lifetime.
    pub(super) task: TaskMode,
    /// Whether replies get an Urdu translation appended.
    pub(super) translate_to_urdu: bool,
    /// Most recent assistant reply, retained for export.
    pub(super) last_response: Option<String>,
    /// Whether a turn is currently in flight.
    pub(super) busy: AtomicBool,
}

impl ChatSession {
    pub fn new(task: TaskMode) -> Self {
        Self {
            messages: vec![Message::system(task.system_prompt())],
            task,
            translate_to_urdu: false,
            last_response: None,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_urdu_translation(mut self, enabled: bool) -> Self {
        self.translate_to_urdu = enabled;
        self
    }

    pub fn task(&self) -> TaskMode {
        self.task
    }

    /// Toggle Urdu annotation for subsequent turns.
    pub fn set_urdu_translation(&mut self, enabled: bool) {
        self.translate_to_urdu = enabled;
    }

    pub fn urdu_translation(&self) -> bool {
        self.translate_to_urdu
    }

    /// The full ordered conversation log, system message included.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Log entries to render: everything after the system message.
    pub fn transcript(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Most recent assistant reply, `None` before the first completed turn.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Number of log entries, system message included. The whole log is
    /// sent on every turn, so this is also a proxy for request size.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub(super) fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }
}
