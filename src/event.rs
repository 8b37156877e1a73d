//! Typed transcript events and the parse result.
//!
//! Every line of a transcript that survives parsing becomes one or more
//! [`Event`]s, collected in emission order into a [`Transcript`].
//!
//! # Serialization
//!
//! Field names on the wire follow the established chat-log export layout,
//! so existing consumers of `chat.json` keep working:
//!
//! | Field | JSON key |
//! |-------|----------|
//! | `kind` | `type` (`msg`, `dchange`, `notification`) |
//! | `sequence_index` | `index` |
//! | `timestamp` | `tstamp` |
//! | `time_of_day` | `hour` |
//! | `speaker` | `person` |
//! | `text` | `message` |
//! | `date_label` | `date` |
//! | `is_self` | `fromMe` |
//! | `media_path` | `attachment` |
//!
//! ```
//! use chatlog::Event;
//!
//! let event = Event::message("Alice", "Hello!", 1577872800, "10:00").with_index(1);
//! let json = serde_json::to_string(&event)?;
//!
//! assert!(json.contains(r#""type":"msg""#));
//! assert!(json.contains(r#""person":"Alice""#));
//! assert!(!json.contains("attachment"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::MEDIA_ATTACHED_TEXT;

/// Title given to group transcripts.
pub const GROUP_TITLE: &str = "Group Chat";

/// Title given to one-on-one transcripts until a non-self speaker shows up.
pub const PERSONAL_TITLE: &str = "Personal Chat";

/// Kind of a transcript event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A message from a speaker, including attachment placeholders.
    #[serde(rename = "msg")]
    Message,
    /// Marks the start of a new calendar day.
    #[serde(rename = "dchange")]
    DateChange,
    /// A line without a speaker (group changes, encryption notices, ...).
    #[serde(rename = "notification")]
    Notification,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Message => write!(f, "message"),
            EventKind::DateChange => write!(f, "date change"),
            EventKind::Notification => write!(f, "notification"),
        }
    }
}

/// One parsed occurrence in a transcript.
///
/// Events are created by the parser with their `sequence_index` already
/// assigned; the index equals the event's position in
/// [`Transcript::events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// What kind of event this is.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Dense, zero-based emission order.
    #[serde(rename = "index")]
    pub sequence_index: usize,

    /// Unix seconds. Lines without their own timestamp inherit the last one seen.
    #[serde(rename = "tstamp")]
    pub timestamp: i64,

    /// `HH:MM`, carried forward like `timestamp`.
    #[serde(rename = "hour")]
    pub time_of_day: String,

    /// Display name of the speaker.
    #[serde(rename = "person", skip_serializing_if = "Option::is_none", default)]
    pub speaker: Option<String>,

    /// Message body, attachment outcome, notification text, or date change text.
    #[serde(rename = "message")]
    pub text: String,

    /// Human-formatted calendar date, only on date changes.
    #[serde(rename = "date", skip_serializing_if = "Option::is_none", default)]
    pub date_label: Option<String>,

    /// Whether the speaker is the transcript owner.
    #[serde(rename = "fromMe", skip_serializing_if = "Option::is_none", default)]
    pub is_self: Option<bool>,

    /// Resolved media file, only on attachment events.
    #[serde(rename = "attachment", skip_serializing_if = "Option::is_none", default)]
    pub media_path: Option<PathBuf>,
}

impl Event {
    fn bare(kind: EventKind, text: String, timestamp: i64, time_of_day: String) -> Self {
        Self {
            kind,
            sequence_index: 0,
            timestamp,
            time_of_day,
            speaker: None,
            text,
            date_label: None,
            is_self: None,
            media_path: None,
        }
    }

    /// Creates a message event.
    pub fn message(
        speaker: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
        time_of_day: impl Into<String>,
    ) -> Self {
        let mut event = Self::bare(
            EventKind::Message,
            text.into(),
            timestamp,
            time_of_day.into(),
        );
        event.speaker = Some(speaker.into());
        event
    }

    /// Creates a notification event.
    pub fn notification(
        text: impl Into<String>,
        timestamp: i64,
        time_of_day: impl Into<String>,
    ) -> Self {
        Self::bare(
            EventKind::Notification,
            text.into(),
            timestamp,
            time_of_day.into(),
        )
    }

    /// Creates a date change event for `label` (e.g. `1 January 2020`).
    pub fn date_change(
        label: impl Into<String>,
        timestamp: i64,
        time_of_day: impl Into<String>,
    ) -> Self {
        let label = label.into();
        let mut event = Self::bare(
            EventKind::DateChange,
            format!("Date changed to {label}"),
            timestamp,
            time_of_day.into(),
        );
        event.date_label = Some(label);
        event
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Sets the sequence index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.sequence_index = index;
        self
    }

    /// Sets the self flag.
    #[must_use]
    pub fn with_is_self(mut self, is_self: bool) -> Self {
        self.is_self = Some(is_self);
        self
    }

    /// Attaches a resolved media path.
    #[must_use]
    pub fn with_media_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.media_path = Some(path.into());
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the timestamp as a UTC datetime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Returns the speaker, if any.
    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    /// Returns the resolved media path, if any.
    pub fn media_path(&self) -> Option<&Path> {
        self.media_path.as_deref()
    }

    /// Returns `true` for message events.
    pub fn is_message(&self) -> bool {
        self.kind == EventKind::Message
    }

    /// Returns `true` for date change events.
    pub fn is_date_change(&self) -> bool {
        self.kind == EventKind::DateChange
    }

    /// Returns `true` if the event came from an attachment line.
    pub fn has_media(&self) -> bool {
        self.media_path.is_some()
    }

    /// Returns `true` for attachments that are missing, unconverted or invalid.
    pub fn has_degraded_media(&self) -> bool {
        self.has_media() && self.text != MEDIA_ATTACHED_TEXT
    }
}

/// Result of parsing one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Caller-supplied group flag.
    #[serde(rename = "groupChat")]
    pub is_group: bool,

    /// Group label, or the other party's name in one-on-one transcripts.
    #[serde(rename = "chatName")]
    pub title: String,

    /// Caller-supplied identity hash, verbatim.
    #[serde(rename = "me")]
    pub self_identity: String,

    /// Fingerprint of `events`, for change detection.
    #[serde(rename = "hash")]
    pub content_digest: String,

    /// Events in emission order.
    #[serde(rename = "chatLog")]
    pub events: Vec<Event>,
}

impl Transcript {
    /// Assembles a transcript, computing the content digest over `events`.
    pub fn new(
        is_group: bool,
        title: impl Into<String>,
        self_identity: impl Into<String>,
        events: Vec<Event>,
    ) -> Result<Self> {
        let content_digest = content_digest(&events)?;
        Ok(Self {
            is_group,
            title: title.into(),
            self_identity: self_identity.into(),
            content_digest,
            events,
        })
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over message events only.
    pub fn messages(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_message())
    }

    /// Iterates over events that carry a media path.
    pub fn media_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.has_media())
    }
}

/// MD5 hex digest of the JSON serialization of `events`.
///
/// Stable for identical event sequences; not a security control.
pub fn content_digest(events: &[Event]) -> Result<String> {
    let json = serde_json::to_vec(events)?;
    Ok(hex::encode(Md5::digest(&json)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_event() {
        let event = Event::message("Alice", "Hello", 1577872800, "10:00");
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.speaker(), Some("Alice"));
        assert_eq!(event.text, "Hello");
        assert!(event.is_self.is_none());
        assert!(!event.has_media());
    }

    #[test]
    fn test_date_change_event() {
        let event = Event::date_change("1 January 2020", 1577872800, "10:00");
        assert!(event.is_date_change());
        assert_eq!(event.date_label.as_deref(), Some("1 January 2020"));
        assert_eq!(event.text, "Date changed to 1 January 2020");
        assert!(event.speaker().is_none());
    }

    #[test]
    fn test_builder() {
        let event = Event::message("Bob", "Media file attached", 0, "00:00")
            .with_index(7)
            .with_is_self(true)
            .with_media_path("/tmp/a.jpg");

        assert_eq!(event.sequence_index, 7);
        assert_eq!(event.is_self, Some(true));
        assert_eq!(event.media_path(), Some(Path::new("/tmp/a.jpg")));
    }

    #[test]
    fn test_degraded_media() {
        let attached =
            Event::message("A", MEDIA_ATTACHED_TEXT, 0, "00:00").with_media_path("/a.jpg");
        let missing = Event::message("A", "Media file attached (file missing)", 0, "00:00")
            .with_media_path("/b.jpg");
        let plain = Event::message("A", "Media file attached (file missing)", 0, "00:00");

        assert!(!attached.has_degraded_media());
        assert!(missing.has_degraded_media());
        assert!(!plain.has_degraded_media());
    }

    #[test]
    fn test_datetime() {
        let event = Event::notification("x", 1577872800, "10:00");
        let dt = event.datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-01-01T10:00:00+00:00");
    }

    #[test]
    fn test_event_wire_names() {
        let event = Event::message("Alice", "Hi", 1, "00:00")
            .with_is_self(false)
            .with_media_path("/m/a.mp3");
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains(r#""type":"msg""#));
        assert!(json.contains(r#""index":0"#));
        assert!(json.contains(r#""tstamp":1"#));
        assert!(json.contains(r#""hour":"00:00""#));
        assert!(json.contains(r#""fromMe":false"#));
        assert!(json.contains(r#""attachment":"/m/a.mp3""#));
        assert!(!json.contains("\"date\""));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"dchange","index":0,"tstamp":5,"hour":"00:00","message":"Date changed to 1 January 1970","date":"1 January 1970"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.is_date_change());
        assert!(event.speaker.is_none());
    }

    #[test]
    fn test_transcript_wire_names() {
        let transcript = Transcript::new(true, GROUP_TITLE, "abc", vec![]).unwrap();
        let json = serde_json::to_string(&transcript).unwrap();

        assert!(json.contains(r#""groupChat":true"#));
        assert!(json.contains(r#""chatName":"Group Chat""#));
        assert!(json.contains(r#""me":"abc""#));
        assert!(json.contains(r#""hash":""#));
        assert!(json.contains(r#""chatLog":[]"#));
    }

    #[test]
    fn test_content_digest_is_stable() {
        let events = vec![Event::message("Alice", "Hello", 1, "00:00")];
        let a = content_digest(&events).unwrap();
        let b = content_digest(&events.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_content_digest_changes_with_content() {
        let a = content_digest(&[Event::message("Alice", "Hello", 1, "00:00")]).unwrap();
        let b = content_digest(&[Event::message("Alice", "Hello!", 1, "00:00")]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_digest() {
        // MD5 of "[]"
        assert_eq!(
            content_digest(&[]).unwrap(),
            "d751713988987e9331980363e24189ce"
        );
    }

    #[test]
    fn test_transcript_filters() {
        let events = vec![
            Event::date_change("1 January 2020", 0, "00:00").with_index(0),
            Event::message("A", "hi", 0, "00:00").with_index(1),
            Event::message("A", "Media file attached", 0, "00:00")
                .with_index(2)
                .with_media_path("/x.jpg"),
            Event::notification("A joined", 0, "00:00").with_index(3),
        ];
        let transcript = Transcript::new(false, "A", "", events).unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.messages().count(), 2);
        assert_eq!(transcript.media_events().count(), 1);
    }
}
