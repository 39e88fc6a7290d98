// src/conversation.rs

use crate::errors::DocentResult;
use crate::message::Message;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes the conversation to `dir` as pretty JSON and returns the file path.
///
/// Export only; transcripts are never read back. An existing export is never
/// overwritten: a `-N` suffix is added when the name is taken.
pub fn save_transcript(messages: &[Message], dir: &Path) -> DocentResult<PathBuf> {
    let stem = format!(
        "docent-transcript-{}",
        Local::now().format("%Y%m%d-%H%M%S%3f")
    );
    let json_str = serde_json::to_string_pretty(messages)?;

    let mut attempt = 0u32;
    let (path, mut file) = loop {
        let file_name = if attempt == 0 {
            format!("{}.json", stem)
        } else {
            format!("{}-{}.json", stem, attempt)
        };
        let path = dir.join(file_name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    };

    file.write_all(json_str.as_bytes())?;
    log::info!("Saved {} messages to {}", messages.len(), path.display());

    Ok(path)
}
