//! Saving downloaded transcripts to disk.

use crate::api::TranscriptFormat;
use crate::error::SideChatError;
use std::path::{Path, PathBuf};

/// File name a transcript of `session_id` is saved under.
pub fn transcript_file_name(session_id: i64, format: TranscriptFormat) -> String {
    format!("chat_{}.{}", session_id, format.extension())
}

/// Writes a transcript into `dir`, creating the directory if needed.
///
/// An existing file of the same name is replaced.
///
/// # Errors
///
/// Returns `SideChatError::Io` if the directory or file cannot be written.
pub async fn save_transcript(
    dir: &Path,
    session_id: i64,
    format: TranscriptFormat,
    contents: &[u8],
) -> Result<PathBuf, SideChatError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(transcript_file_name(session_id, format));
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}
