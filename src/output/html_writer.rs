//! HTML output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{MEDIA_NOT_SAVED, OutputConfig};
use crate::error::Result;
use crate::event::{Event, Transcript};

const AUDIO_EXTENSIONS: &[&str] = &["mp3"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Writes the transcript as a standalone HTML page.
pub fn write_html(
    transcript: &Transcript,
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let html = to_html(transcript, config);
    let mut file = File::create(output_path)?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

/// Converts the transcript to an HTML page.
///
/// MP3 attachments become `<audio>` players, JPEG and PNG attachments
/// `<img>` elements; everything else is a paragraph.
pub fn to_html(transcript: &Transcript, config: &OutputConfig) -> String {
    let mut body = String::new();
    for event in &transcript.events {
        body.push_str("    ");
        body.push_str(&render_event(event, config));
        body.push('\n');
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{}</title>\n</head>\n<body>\n  <div>\n{body}  </div>\n</body>\n</html>\n",
        escape(&transcript.title)
    )
}

fn render_event(event: &Event, config: &OutputConfig) -> String {
    let date = event
        .datetime()
        .map(|dt| dt.format("%m/%d/%y, %H:%M").to_string())
        .unwrap_or_default();
    let header = format!(
        "<i>{date}</i> - <b>{}</b>",
        escape(event.speaker().unwrap_or_default())
    );

    let Some(path) = event.media_path() else {
        return format!("<p>{header}: {}</p>", escape(&event.text));
    };
    if config.exclude_media {
        return format!("<p>{header}: {MEDIA_NOT_SAVED}</p>");
    }

    let src = escape(&web_path(path));
    match media_kind(path) {
        MediaKind::Audio => format!(
            "<figure><figcaption>{header}</figcaption><audio controls><source src=\"{src}\" type=\"audio/mpeg\"></audio></figure>"
        ),
        MediaKind::Image => format!(
            "<figure><figcaption>{header}</figcaption><img src=\"{src}\" alt=\"{src}\"></figure>"
        ),
        MediaKind::Other => format!("<p>{header}: [Attachment] {src}</p>"),
    }
}

enum MediaKind {
    Audio,
    Image,
    Other,
}

fn media_kind(path: &Path) -> MediaKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Audio
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else {
        MediaKind::Other
    }
}

/// Forward slashes regardless of platform.
fn web_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
