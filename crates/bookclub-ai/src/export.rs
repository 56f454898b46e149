//! Transcript export: ad hoc text snapshots of a session.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::session::ChatSession;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the most recent assistant reply to `last_response.txt` under
/// `dir`. Returns `None` when no turn has completed yet.
pub fn export_last_response(
    session: &ChatSession,
    dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(reply) = session.last_response() else {
        return Ok(None);
    };

    let path = dir.join("last_response.txt");
    fs::write(&path, reply)?;
    debug!(path = %path.display(), "last response exported");
    Ok(Some(path))
}

/// Write the full role-labeled transcript to a timestamped file under
/// `dir` and return its path.
///
/// Entries are `Role: content`, capitalized role, one blank line between
/// them, system message included. Timestamps have second resolution, so a
/// numeric suffix is added on collision; an invocation never overwrites an
/// earlier export.
pub fn export_transcript(session: &ChatSession, dir: &Path) -> Result<PathBuf, ExportError> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = unique_path(dir, &format!("chat_history_{timestamp}"));

    let mut out = String::new();
    for msg in session.messages() {
        out.push_str(msg.role.capitalized());
        out.push_str(": ");
        out.push_str(&msg.content);
        out.push_str("\n\n");
    }

    fs::write(&path, out)?;
    debug!(path = %path.display(), entries = session.message_count(), "transcript exported");
    Ok(path)
}

fn unique_path(dir: &Path, stem: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.txt"));
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 2;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.txt"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
