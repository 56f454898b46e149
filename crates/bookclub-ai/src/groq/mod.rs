//! Groq chat-completions client (OpenAI-compatible API).

mod api;
mod client;
mod config;

pub use client::GroqClient;
pub use config::GroqConfig;
