use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript directory unusable: {0}")]
    Directory(String),
    #[error("failed to serialize transcript: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Everything a finished run showed the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub run_id: u64,
    pub finished_utc: String,
    pub outcome: String,
    pub log: Vec<String>,
    pub snapshot: Value,
}

/// Writes the transcript as pretty JSON to `{dir}/{file_name}`, replacing any
/// existing file. The file only appears once fully written.
pub fn write_transcript(
    dir: &Path,
    file_name: &str,
    transcript: &Transcript,
) -> Result<PathBuf, TranscriptError> {
    if dir.exists() && !dir.is_dir() {
        return Err(TranscriptError::Directory(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir).map_err(|e| TranscriptError::Directory(e.to_string()))?;

    let body = serde_json::to_string_pretty(transcript)?;
    let target = dir.join(file_name);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| TranscriptError::Io(e.error))?;
    Ok(target)
}
