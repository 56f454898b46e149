//! Tests for session initialization and turn execution.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::speech::{SpeechError, SpeechToText};
use crate::translate::Translator;
use crate::{AiError, CompletionClient, Message, Role};

use super::turn::COMPLETION_FAILURE_REPLY;
use super::{ChatSession, TaskMode};

/// Completion mock that returns a fixed reply and records every request.
struct FixedCompletion {
    reply: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl FixedCompletion {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Vec<Message> {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionClient for FixedCompletion {
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

/// Completion mock that always fails.
struct FailingCompletion(fn() -> AiError);

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _messages: &[Message]) -> Result<String, AiError> {
        Err((self.0)())
    }
}

/// Translator mock returning a fixed translation.
struct FixedTranslator(&'static str);

#[async_trait]
impl Translator for FixedTranslator {
    async fn translate(&self, _text: &str, target_lang: &str) -> Result<String, AiError> {
        assert_eq!(target_lang, "ur");
        Ok(self.0.to_string())
    }
}

/// Translator mock that always fails.
struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, AiError> {
        Err(AiError::NetworkError("connection reset".into()))
    }
}

/// Translator that panics if invoked; for turns that must not translate.
struct NoTranslator;

#[async_trait]
impl Translator for NoTranslator {
    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, AiError> {
        panic!("translator must not be called");
    }
}

/// Speech mock with a scripted outcome.
struct ScriptedSpeech(Result<&'static str, fn() -> SpeechError>);

#[async_trait]
impl SpeechToText for ScriptedSpeech {
    async fn recognize(&self, _audio_wav: Vec<u8>) -> Result<String, SpeechError> {
        match &self.0 {
            Ok(text) => Ok(text.to_string()),
            Err(make) => Err(make()),
        }
    }
}

#[test]
fn every_mode_starts_with_one_system_message() {
    for mode in TaskMode::ALL {
        let session = ChatSession::new(mode);
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages()[0].role, Role::System);

        let content = &session.messages()[0].content;
        assert!(
            content.starts_with("You are a helpful AI for book clubs."),
            "{mode}: missing base instruction"
        );
        assert!(
            content.len() > "You are a helpful AI for book clubs.".len(),
            "{mode}: task suffix missing"
        );
        assert_eq!(content, &mode.system_prompt());
    }
}

#[test]
fn mode_suffixes_are_distinct() {
    let mut prompts: Vec<String> = TaskMode::ALL.iter().map(|m| m.system_prompt()).collect();
    prompts.sort();
    prompts.dedup();
    assert_eq!(prompts.len(), 5);
}

#[test]
fn mode_labels_round_trip() {
    for mode in TaskMode::ALL {
        assert_eq!(mode.label().parse::<TaskMode>().unwrap(), mode);
    }
    assert_eq!(
        "summarize chapter".parse::<TaskMode>().unwrap(),
        TaskMode::SummarizeChapter
    );
    assert!("Write My Essay".parse::<TaskMode>().is_err());
}

#[tokio::test]
async fn successful_turns_alternate_roles() {
    let completion = FixedCompletion::new("Here is a short summary.");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    for n in 1..=3u32 {
        let reply = session
            .handle_input(&completion, &NoTranslator, format!("Chapter {n} text"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Here is a short summary."));
        assert_eq!(session.message_count(), 1 + 2 * n as usize);
    }

    for (i, msg) in session.messages().iter().enumerate().skip(1) {
        let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
        assert_eq!(msg.role, expected, "index {i}");
    }
}

#[tokio::test]
async fn completion_receives_full_log_in_order() {
    let completion = FixedCompletion::new("ok");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    session
        .handle_input(&completion, &NoTranslator, "Chapter 3 is about X.")
        .await
        .unwrap();

    let request = completion.last_request();
    assert_eq!(request.len(), 2);
    assert_eq!(request[0].role, Role::System);
    assert_eq!(request[0].content, TaskMode::SummarizeChapter.system_prompt());
    assert_eq!(request[1].role, Role::User);
    assert_eq!(request[1].content, "Chapter 3 is about X.");

    session
        .handle_input(&completion, &NoTranslator, "And chapter 4?")
        .await
        .unwrap();

    // Second request carries the whole accumulated log.
    let request = completion.last_request();
    assert_eq!(request.len(), 4);
    assert_eq!(request[2].role, Role::Assistant);
    assert_eq!(request[3].content, "And chapter 4?");
}

#[tokio::test]
async fn completion_failure_becomes_fixed_literal() {
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    let failure = FailingCompletion(|| AiError::ApiError("HTTP 500 Internal Server Error".into()));
    let reply = session
        .handle_input(&failure, &NoTranslator, "Chapter 3 is about X.")
        .await
        .unwrap();

    assert_eq!(reply.as_deref(), Some(COMPLETION_FAILURE_REPLY));
    assert_eq!(
        session.messages().last().unwrap().content,
        "Error communicating with Groq API."
    );
    assert_eq!(session.last_response(), Some(COMPLETION_FAILURE_REPLY));
    // Still one user and one assistant entry for the turn.
    assert_eq!(session.message_count(), 3);
}

#[tokio::test]
async fn timeout_and_network_failures_take_the_same_path() {
    for make in [
        (|| AiError::Timeout) as fn() -> AiError,
        || AiError::NetworkError("dns failure".into()),
        || AiError::RateLimited,
        || AiError::ParseError("bad json".into()),
    ] {
        let mut session = ChatSession::new(TaskMode::DiscussionQuestions);
        session
            .handle_input(&FailingCompletion(make), &NoTranslator, "some text")
            .await
            .unwrap();
        assert_eq!(
            session.messages().last().unwrap().content,
            COMPLETION_FAILURE_REPLY
        );
    }
}

#[tokio::test]
async fn urdu_translation_appends_fixed_suffix() {
    let completion = FixedCompletion::new("A fine chapter.");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter).with_urdu_translation(true);

    let reply = session
        .handle_input(&completion, &FixedTranslator("ایک عمدہ باب۔"), "Chapter 1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply, "A fine chapter.\n\n (Translated to Urdu):\nایک عمدہ باب۔");
    assert_eq!(session.last_response(), Some(reply.as_str()));
    assert_eq!(session.messages().last().unwrap().content, reply);
}

#[tokio::test]
async fn urdu_translation_failure_annotates_reply() {
    let completion = FixedCompletion::new("A fine chapter.");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter).with_urdu_translation(true);

    let reply = session
        .handle_input(&completion, &FailingTranslator, "Chapter 1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        reply,
        "A fine chapter.\n\nUrdu translation failed: Network error: connection reset"
    );
    assert_eq!(session.last_response(), Some(reply.as_str()));
}

#[tokio::test]
async fn urdu_disabled_leaves_reply_untouched() {
    let completion = FixedCompletion::new("Plain reply.");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);
    assert!(!session.urdu_translation());

    let reply = session
        .handle_input(&completion, &FailingTranslator, "Chapter 1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "Plain reply.");
}

#[tokio::test]
async fn completion_failure_skips_translation() {
    let failure = FailingCompletion(|| AiError::ApiError("HTTP 502".into()));
    let mut session = ChatSession::new(TaskMode::SummarizeChapter).with_urdu_translation(true);

    // NoTranslator panics if invoked; the failure literal is never translated.
    let reply = session
        .handle_input(&failure, &NoTranslator, "Chapter 1")
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some(COMPLETION_FAILURE_REPLY));
}

#[tokio::test]
async fn empty_input_is_a_no_op() {
    let completion = FixedCompletion::new("unused");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    for input in ["", "   ", "\n\t"] {
        let reply = session
            .handle_input(&completion, &NoTranslator, input)
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    assert_eq!(session.message_count(), 1);
    assert_eq!(completion.calls(), 0);
    assert!(session.last_response().is_none());
}

#[tokio::test]
async fn absent_audio_upload_is_a_no_op() {
    let completion = FixedCompletion::new("unused");
    let speech = ScriptedSpeech(Ok("unused"));
    let mut session = ChatSession::new(TaskMode::VoiceInput);

    let reply = session
        .handle_voice_upload(&completion, &NoTranslator, &speech, None)
        .await
        .unwrap();

    assert!(reply.is_none());
    assert_eq!(session.message_count(), 1);
    assert_eq!(completion.calls(), 0);
}

#[tokio::test]
async fn voice_transcript_becomes_turn_input() {
    let completion = FixedCompletion::new("Noted.");
    let speech = ScriptedSpeech(Ok("what happens in chapter five"));
    let mut session = ChatSession::new(TaskMode::VoiceInput);

    session
        .handle_voice_upload(&completion, &NoTranslator, &speech, Some(vec![0u8; 16]))
        .await
        .unwrap();

    let request = completion.last_request();
    assert_eq!(request[1].content, "what happens in chapter five");
    assert_eq!(session.message_count(), 3);
}

#[tokio::test]
async fn recognition_failure_text_runs_a_normal_turn() {
    let completion = FixedCompletion::new("Could you try again?");
    let speech = ScriptedSpeech(Err(|| SpeechError::Unrecognized));
    let mut session = ChatSession::new(TaskMode::VoiceInput);

    let reply = session
        .handle_voice_upload(&completion, &NoTranslator, &speech, Some(vec![0u8; 16]))
        .await
        .unwrap();

    // The failure notice is ordinary input text; the turn still runs.
    assert_eq!(completion.calls(), 1);
    let request = completion.last_request();
    assert_eq!(request[1].role, Role::User);
    assert_eq!(request[1].content, "Sorry, I couldn't understand the audio.");
    assert_eq!(reply.as_deref(), Some("Could you try again?"));
    assert_eq!(session.message_count(), 3);
}

#[tokio::test]
async fn summarize_scenario_success() {
    let completion = FixedCompletion::new("Chapter 3 covers X in brief.");
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    let reply = session
        .handle_input(&completion, &NoTranslator, "Chapter 3 is about X.")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.message_count(), 3);
    assert_eq!(session.messages()[2].role, Role::Assistant);
    assert_eq!(session.last_response(), Some(reply.as_str()));
    assert_eq!(session.last_response(), Some("Chapter 3 covers X in brief."));
}

#[tokio::test]
async fn summarize_scenario_server_error() {
    let failure = FailingCompletion(|| AiError::ApiError("HTTP 500: upstream".into()));
    let mut session = ChatSession::new(TaskMode::SummarizeChapter);

    session
        .handle_input(&failure, &NoTranslator, "Chapter 3 is about X.")
        .await
        .unwrap();

    assert_eq!(
        session.messages()[2].content,
        "Error communicating with Groq API."
    );
    assert_eq!(
        session.last_response(),
        Some("Error communicating with Groq API.")
    );
}

#[tokio::test]
async fn transcript_skips_system_message() {
    let completion = FixedCompletion::new("reply");
    let mut session = ChatSession::new(TaskMode::RecapCharactersThemes);

    assert!(session.transcript().is_empty());

    session
        .handle_input(&completion, &NoTranslator, "recap please")
        .await
        .unwrap();

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[1].role, Role::Assistant);
}
