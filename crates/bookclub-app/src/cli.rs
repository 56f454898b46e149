use clap::Parser;

/// Book Club AI Companion — chat about summaries, quotes, and discussions.
#[derive(Parser, Debug)]
#[command(name = "bookclub", version, about)]
pub struct Args {
    /// Task mode: "Summarize Chapter", "Translate & Explain Quote",
    /// "Generate Discussion Questions", "Recap Characters & Themes",
    /// or "Voice-to-Text Input".
    #[arg(short = 't', long, default_value = "Summarize Chapter")]
    pub task: String,

    /// Translate each response to Urdu.
    #[arg(long)]
    pub urdu: bool,

    /// WAV recording to transcribe as the first turn (voice mode only).
    #[arg(long)]
    pub audio: Option<String>,

    /// Directory for exported transcripts and responses.
    #[arg(long, default_value = ".")]
    pub out_dir: String,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
