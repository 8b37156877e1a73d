//! Classification of a line's content once the timestamp is stripped.

use std::sync::LazyLock;

use regex::Regex;

/// `<attached: PATH>` anywhere in the line.
static ATTACHMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<attached: (.+)>").expect("attachment pattern compiles"));

/// `Speaker: body`, the speaker being everything up to the first colon.
static SPEAKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+): (.*)$").expect("speaker pattern compiles"));

const LEFT_TO_RIGHT_MARK: char = '\u{200e}';

/// What a line says, independent of when it was said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContent<'a> {
    /// References a media file.
    Attachment {
        /// Sender named before the marker, if any
        speaker: Option<&'a str>,
        /// Path inside the marker, trimmed
        reference: &'a str,
    },
    /// `Speaker: body`.
    Message {
        /// Display name
        speaker: &'a str,
        /// Message body, verbatim
        body: &'a str,
    },
    /// Anything else with text in it.
    Notification(&'a str),
    /// Nothing but whitespace.
    Blank,
}

/// Classifies `text`, which should already be stripped of its timestamp.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::{LineContent, classify};
///
/// assert_eq!(
///     classify("Jane: <attached: 00000012-PHOTO.jpg>"),
///     LineContent::Attachment { speaker: Some("Jane"), reference: "00000012-PHOTO.jpg" },
/// );
/// assert_eq!(
///     classify("Jane: see you"),
///     LineContent::Message { speaker: "Jane", body: "see you" },
/// );
/// ```
pub fn classify(text: &str) -> LineContent<'_> {
    let text = text.trim();
    if text.is_empty() {
        return LineContent::Blank;
    }

    if let Some(caps) = ATTACHMENT.captures(text) {
        let (Some(marker), Some(reference)) = (caps.get(0), caps.get(1)) else {
            return LineContent::Notification(text);
        };
        return LineContent::Attachment {
            speaker: sender_before(&text[..marker.start()]),
            reference: reference.as_str().trim(),
        };
    }

    if let Some(caps) = SPEAKER.captures(text) {
        if let (Some(speaker), Some(body)) = (caps.get(1), caps.get(2)) {
            return LineContent::Message {
                speaker: speaker.as_str(),
                body: body.as_str(),
            };
        }
    }

    LineContent::Notification(text)
}

/// Sender named in front of an attachment marker (`"Jane: "`).
fn sender_before(prefix: &str) -> Option<&str> {
    let name = prefix
        .trim_end_matches(|c: char| c.is_whitespace() || c == LEFT_TO_RIGHT_MARK)
        .strip_suffix(':')?
        .trim();
    (!name.is_empty() && !name.contains(':')).then_some(name)
}
