mod cli;

use std::io::{BufRead, Write};
use std::path::Path;

use tracing_subscriber::EnvFilter;

use bookclub_ai::{
    export_last_response, export_transcript, ChatSession, CompletionClient, GroqClient,
    GroqConfig, GtxTranslateClient, SpeechToText, TaskMode, Translator, WhisperClient,
    WhisperConfig,
};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root — two levels up from crates/bookclub-app/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn prompt(text: &str) -> Option<String> {
    print!("{text}");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(_) => None,
    }
}

/// Read a WAV upload for a voice turn. Only the .wav container is accepted.
fn read_wav_upload(path: &str) -> Option<Vec<u8>> {
    let path = Path::new(path.trim());
    if !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
    {
        println!("Only WAV uploads are supported.");
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            println!("Could not read {}: {e}", path.display());
            None
        }
    }
}

async fn run_voice_turn(
    session: &mut ChatSession,
    groq: &dyn CompletionClient,
    translator: &dyn Translator,
    speech: &dyn SpeechToText,
    audio: Option<Vec<u8>>,
) {
    match session
        .handle_voice_upload(groq, translator, speech, audio)
        .await
    {
        Ok(Some(reply)) => {
            // Show what the assistant heard, then its reply.
            if let Some(spoken) = session.transcript().iter().rev().nth(1) {
                println!("Transcribed Text: {}", spoken.content);
            }
            println!("Assistant: {reply}\n");
        }
        Ok(None) => {}
        Err(e) => tracing::error!("turn rejected: {e}"),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("bookclub=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "bookclub=info".parse().unwrap()),
            ),
        )
        .init();

    let task: TaskMode = match args.task.parse() {
        Ok(task) => task,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Available task modes:");
            for mode in TaskMode::ALL {
                eprintln!("  {}", mode.label());
            }
            std::process::exit(2);
        }
    };

    let groq = match GroqConfig::from_env() {
        Ok(config) => GroqClient::new(config),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let translator = GtxTranslateClient::default();
    let speech = WhisperClient::new(WhisperConfig::new(
        std::env::var("OPENAI_API_KEY").unwrap_or_default(),
    ));

    let mut session = ChatSession::new(task).with_urdu_translation(args.urdu);
    let out_dir = std::path::PathBuf::from(&args.out_dir);

    tracing::info!("Book Club AI Companion v{}", env!("CARGO_PKG_VERSION"));
    println!("Book Club AI Companion — {}", task.label());
    println!("Talk to your assistant about book summaries, quotes, and discussions.");
    println!("Commands: :save (last response), :export (chat history), :quit\n");

    // First voice turn from the command line, if provided.
    if let Some(ref audio_path) = args.audio {
        if task.is_voice() {
            let audio = read_wav_upload(audio_path);
            run_voice_turn(&mut session, &groq, &translator, &speech, audio).await;
        } else {
            println!("--audio is only used with the Voice-to-Text Input task.\n");
        }
    }

    let input_prompt = if task.is_voice() {
        "Path to WAV upload (or command): "
    } else {
        "You: "
    };

    loop {
        let Some(line) = prompt(input_prompt) else {
            break; // EOF
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":save" => {
                match export_last_response(&session, &out_dir) {
                    Ok(Some(path)) => println!("Last response saved to {}\n", path.display()),
                    Ok(None) => println!("Nothing to save yet.\n"),
                    Err(e) => tracing::error!("save failed: {e}"),
                }
                continue;
            }
            ":export" => {
                match export_transcript(&session, &out_dir) {
                    Ok(path) => println!("Chat history saved to {}\n", path.display()),
                    Err(e) => tracing::error!("export failed: {e}"),
                }
                continue;
            }
            _ => {}
        }

        if task.is_voice() {
            if line.trim().is_empty() {
                continue; // no upload, no turn
            }
            let audio = read_wav_upload(&line);
            run_voice_turn(&mut session, &groq, &translator, &speech, audio).await;
        } else {
            match session.handle_input(&groq, &translator, line).await {
                Ok(Some(reply)) => println!("Assistant: {reply}\n"),
                Ok(None) => {} // empty input, no turn
                Err(e) => tracing::error!("turn rejected: {e}"),
            }
        }
    }

    tracing::info!("session ended ({} log entries)", session.message_count());
}
