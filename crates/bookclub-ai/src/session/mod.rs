//! Conversation session management.
//!
//! A `ChatSession` owns the ordered conversation log for one user session
//! and runs one turn at a time: append the user's text, send the full log
//! to the completion collaborator, optionally annotate the reply with an
//! Urdu translation, append the reply.

mod manager;
mod turn;
mod types;

pub use manager::ChatSession;
pub use turn::COMPLETION_FAILURE_REPLY;
pub use types::TaskMode;

#[cfg(test)]
mod tests;
