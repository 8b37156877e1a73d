//! Plain text output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{MEDIA_NOT_SAVED, OutputConfig};
use crate::error::Result;
use crate::event::{Event, Transcript};

/// Writes the transcript as text, one line per event.
///
/// # Format
/// ```text
/// 1/1/2020, 10:00:00 AM - : Date changed to 1 January 2020
/// 1/1/2020, 10:00:00 AM - Alice: Hello
/// 1/1/2020, 10:01:00 AM - Alice: [Attachment] /chat/00000012-PHOTO.jpg
/// ```
pub fn write_txt(
    transcript: &Transcript,
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let text = to_txt(transcript, config);
    let mut file = File::create(output_path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

/// Converts the transcript to text.
pub fn to_txt(transcript: &Transcript, config: &OutputConfig) -> String {
    transcript
        .events
        .iter()
        .map(|event| format_line(event, config))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(event: &Event, config: &OutputConfig) -> String {
    let date = event
        .datetime()
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_default();
    let speaker = event.speaker().unwrap_or_default();

    match event.media_path() {
        Some(_) if config.exclude_media => format!("{date} - {speaker}: {MEDIA_NOT_SAVED}"),
        Some(path) => format!("{date} - {speaker}: [Attachment] {}", path.display()),
        None => format!("{date} - {speaker}: {}", event.text),
    }
}
