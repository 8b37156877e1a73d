//! Transcript parser.
//!
//! Lines are processed strictly in order. Each line goes through
//! [`TranscriptParser::step`] together with the [`ScanState`] carried over
//! from the previous lines and yields zero, one or two events (a date change
//! followed by the line's own event).
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ParseOptions;
//! use chatlog::parser::TranscriptParser;
//!
//! # async fn example() -> chatlog::Result<()> {
//! let parser = TranscriptParser::new(ParseOptions::new(".").with_group(true))?;
//! let transcript = parser
//!     .parse_str("[01.01.20, 10:00:00] John Doe: Hello World!")
//!     .await?;
//!
//! assert_eq!(transcript.title, "Group Chat");
//! assert_eq!(transcript.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{MediaToolsConfig, ParseOptions};
use crate::error::{ChatlogError, Result};
use crate::event::{Event, GROUP_TITLE, PERSONAL_TITLE, Transcript};
use crate::media::{
    AttachmentOutcome, AttachmentResolver, ExifToolValidator, FfmpegTranscoder, MediaTranscoder,
    MediaValidator,
};
use crate::parsing::{DayTracker, Identity, LineContent, Recognized, TimestampRecognizer, classify};

/// Speaker assumed for attachments seen before anyone has spoken.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// State carried from one line to the next.
#[derive(Debug, Clone)]
pub struct ScanState {
    last_speaker: String,
    last_time_of_day: String,
    last_timestamp: i64,
    days: DayTracker,
    title: String,
    next_index: usize,
}

impl ScanState {
    /// Fresh state; lines before the first timestamp inherit `fallback`.
    pub fn new(is_group: bool, fallback: DateTime<Utc>) -> Self {
        Self {
            last_speaker: UNKNOWN_SPEAKER.to_string(),
            last_time_of_day: fallback.format("%H:%M").to_string(),
            last_timestamp: fallback.timestamp(),
            days: DayTracker::new(),
            title: if is_group { GROUP_TITLE } else { PERSONAL_TITLE }.to_string(),
            next_index: 0,
        }
    }

    /// Current transcript title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Most recent speaker.
    pub fn last_speaker(&self) -> &str {
        &self.last_speaker
    }

    /// Number of events emitted so far.
    pub fn emitted(&self) -> usize {
        self.next_index
    }

    fn emit(&mut self, event: Event) -> Event {
        let event = event.with_index(self.next_index);
        self.next_index += 1;
        event
    }
}

/// Parses transcripts into [`Transcript`]s.
pub struct TranscriptParser {
    options: ParseOptions,
    tools: MediaToolsConfig,
    recognizer: TimestampRecognizer,
    identity: Identity,
    transcoder: Arc<dyn MediaTranscoder>,
    validator: Arc<dyn MediaValidator>,
}

impl TranscriptParser {
    /// Creates a parser with the default media tools.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InvalidPattern`] if the timestamp pattern
    /// cannot be compiled or lacks a named group.
    pub fn new(options: ParseOptions) -> Result<Self> {
        let recognizer = TimestampRecognizer::with_pattern(&options.timestamp_pattern)?;
        let identity = Identity::new(options.identity_hash.as_deref());
        let tools = MediaToolsConfig::default();

        Ok(Self {
            transcoder: Arc::new(FfmpegTranscoder::with_program(&tools.transcoder_program)),
            validator: Arc::new(ExifToolValidator::with_program(&tools.validator_program)),
            options,
            tools,
            recognizer,
            identity,
        })
    }

    /// Uses the tool programs and conversion from `tools`.
    #[must_use]
    pub fn with_tools(mut self, tools: MediaToolsConfig) -> Self {
        self.transcoder = Arc::new(FfmpegTranscoder::with_program(&tools.transcoder_program));
        self.validator = Arc::new(ExifToolValidator::with_program(&tools.validator_program));
        self.tools = tools;
        self
    }

    /// Replaces the transcoder.
    #[must_use]
    pub fn with_transcoder(mut self, transcoder: Arc<dyn MediaTranscoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Replaces the validator used when `validate_media` is set.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn MediaValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Returns the options this parser was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Reads and parses the transcript at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InputNotFound`] if `path` does not exist, and
    /// the errors of [`parse_str`](Self::parse_str).
    pub async fn parse_file(&self, path: impl AsRef<Path>) -> Result<Transcript> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ChatlogError::input_not_found(path));
        }

        info!(path = %path.display(), "parsing transcript");
        let content = tokio::fs::read_to_string(path).await?;
        self.parse_str(&content).await
    }

    /// Parses transcript text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::TranscoderUnavailable`] if conversion is
    /// enabled and the transcoder cannot be run. Nothing is parsed in that
    /// case.
    pub async fn parse_str(&self, content: &str) -> Result<Transcript> {
        if self.options.convert_media && !self.transcoder.is_available().await {
            return Err(ChatlogError::transcoder_unavailable(self.transcoder.name()));
        }

        let resolver = self.resolver();
        let fallback = self.options.fallback_time.unwrap_or_else(Utc::now);
        let mut state = ScanState::new(self.options.is_group, fallback);
        let mut events = Vec::new();

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        for line in content.lines() {
            events.extend(self.step(&mut state, &resolver, line).await);
        }

        info!(
            events = events.len(),
            title = %state.title,
            "transcript parsed"
        );
        Transcript::new(
            self.options.is_group,
            state.title,
            self.options.self_identity(),
            events,
        )
    }

    /// Processes one line, returning the events it produced in order.
    pub async fn step(
        &self,
        state: &mut ScanState,
        resolver: &AttachmentResolver,
        line: &str,
    ) -> Vec<Event> {
        let (stamp, content) = match self.recognizer.recognize(line) {
            Recognized::Stamped {
                at,
                remainder,
                time_of_day,
            } => {
                debug!(%at, remainder, "stamped line");
                (Some((at, time_of_day)), remainder)
            }
            Recognized::Unstamped => (None, line),
            Recognized::InvalidDate { prefix } => {
                warn!(prefix, "invalid date in line, skipping");
                return Vec::new();
            }
        };

        // The clock only moves for lines that produce an event
        let (timestamp, time_of_day) = match &stamp {
            Some((at, time_of_day)) => (at.timestamp(), time_of_day.clone()),
            None => (state.last_timestamp, state.last_time_of_day.clone()),
        };
        let Some(event) = self
            .line_event(state, resolver, content, timestamp, time_of_day, stamp.is_some())
            .await
        else {
            return Vec::new();
        };

        let mut emitted = Vec::with_capacity(2);
        if let Some((at, time_of_day)) = stamp {
            state.last_timestamp = at.timestamp();
            state.last_time_of_day = time_of_day;
            if let Some(label) = state.days.observe(at) {
                let change = Event::date_change(label, at.timestamp(), &state.last_time_of_day);
                emitted.push(state.emit(change));
            }
        }
        emitted.push(state.emit(event));
        emitted
    }

    /// The event a line's content stands for, before indexing.
    async fn line_event(
        &self,
        state: &mut ScanState,
        resolver: &AttachmentResolver,
        content: &str,
        timestamp: i64,
        time_of_day: String,
        stamped: bool,
    ) -> Option<Event> {
        match classify(content) {
            LineContent::Attachment { speaker, reference } => {
                let outcome = resolver.resolve(reference).await;
                let (Some(text), Some(path)) = (outcome.text(), outcome.media_path()) else {
                    return None;
                };
                if let AttachmentOutcome::Attached { path } = &outcome {
                    debug!(path = %path.display(), "attachment resolved");
                }

                let is_self = match speaker {
                    Some(name) => self.note_speaker(state, name),
                    None => self.identity.is_self(&state.last_speaker),
                };
                Some(
                    Event::message(&state.last_speaker, text, timestamp, time_of_day)
                        .with_is_self(is_self)
                        .with_media_path(path),
                )
            }
            LineContent::Message { speaker, body } => {
                let is_self = self.note_speaker(state, speaker);
                Some(Event::message(speaker, body, timestamp, time_of_day).with_is_self(is_self))
            }
            LineContent::Notification(text) => {
                Some(Event::notification(text, timestamp, time_of_day))
            }
            LineContent::Blank if stamped => Some(Event::notification("", timestamp, time_of_day)),
            LineContent::Blank => None,
        }
    }

    /// Records `speaker` as the latest speaker and returns whether it is self.
    ///
    /// In one-on-one transcripts the title follows the latest non-self speaker.
    fn note_speaker(&self, state: &mut ScanState, speaker: &str) -> bool {
        let is_self = self.identity.is_self(speaker);
        if !self.options.is_group && !is_self {
            state.title = speaker.to_string();
        }
        state.last_speaker = speaker.to_string();
        is_self
    }

    /// Builds the attachment resolver for one parse.
    pub fn resolver(&self) -> AttachmentResolver {
        let resolver = AttachmentResolver::new(&self.options.media_dir, self.transcoder.clone())
            .with_convert(self.options.convert_media)
            .with_exclude(self.options.exclude_media)
            .with_conversion(&self.tools.source_extension, &self.tools.target_extension);

        if self.options.validate_media {
            resolver.with_validator(self.validator.clone())
        } else {
            resolver
        }
    }
}

impl std::fmt::Debug for TranscriptParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptParser")
            .field("options", &self.options)
            .field("tools", &self.tools)
            .field("transcoder", &self.transcoder.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::parsing::identity_hash;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct UnavailableTranscoder;

    #[async_trait]
    impl MediaTranscoder for UnavailableTranscoder {
        fn name(&self) -> &str {
            "ffmpeg"
        }

        async fn is_available(&self) -> bool {
            false
        }

        async fn transcode(&self, source: &Path, _dest: &Path) -> Result<()> {
            Err(ChatlogError::transcode(source, "unavailable"))
        }
    }

    fn pinned() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, 1, 12, 34, 0).unwrap()
    }

    fn parser(options: ParseOptions) -> TranscriptParser {
        TranscriptParser::new(options.with_fallback_time(pinned()))
            .unwrap()
            .with_transcoder(Arc::new(UnavailableTranscoder))
    }

    async fn parse(options: ParseOptions, content: &str) -> Transcript {
        parser(options).parse_str(content).await.unwrap()
    }

    #[tokio::test]
    async fn test_group_message() {
        let transcript = parse(
            ParseOptions::new(".").with_group(true),
            "[01.01.20, 10:00:00] John Doe: Hello World!",
        )
        .await;

        assert_eq!(transcript.title, GROUP_TITLE);
        assert_eq!(transcript.len(), 2);

        let change = &transcript.events[0];
        assert_eq!(change.kind, EventKind::DateChange);
        assert_eq!(change.date_label.as_deref(), Some("1 January 2020"));
        assert_eq!(change.timestamp, 1_577_872_800);

        let msg = &transcript.events[1];
        assert_eq!(msg.kind, EventKind::Message);
        assert_eq!(msg.speaker(), Some("John Doe"));
        assert_eq!(msg.text, "Hello World!");
        assert_eq!(msg.time_of_day, "10:00");
        assert_eq!(msg.is_self, Some(false));
        assert_eq!(msg.sequence_index, 1);
    }

    #[tokio::test]
    async fn test_one_date_change_per_day() {
        let transcript = parse(
            ParseOptions::default(),
            "[01.01.20, 10:00:00] A: one\n[01.01.20, 11:00:00] B: two\n[02.01.20, 09:00:00] A: three",
        )
        .await;

        let kinds: Vec<EventKind> = transcript.events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::DateChange,
                EventKind::Message,
                EventKind::Message,
                EventKind::DateChange,
                EventKind::Message,
            ]
        );
        assert_eq!(
            transcript.events[3].date_label.as_deref(),
            Some("2 January 2020")
        );
    }

    #[tokio::test]
    async fn test_invalid_date_skipped() {
        let transcript = parse(
            ParseOptions::default(),
            "[13.45.20, 10:00:00] X: hi\n[01.01.20, 10:00:00] Y: ok",
        )
        .await;

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.events[1].speaker(), Some("Y"));
        assert_eq!(transcript.events[0].sequence_index, 0);
    }

    #[tokio::test]
    async fn test_notification() {
        let transcript = parse(
            ParseOptions::default(),
            "[01.01.20, 10:00:00] Alice created group \"Trip\"",
        )
        .await;

        let event = &transcript.events[1];
        assert_eq!(event.kind, EventKind::Notification);
        assert_eq!(event.text, "Alice created group \"Trip\"");
        assert!(event.speaker().is_none());
        assert!(event.is_self.is_none());
    }

    #[tokio::test]
    async fn test_continuation_lines_inherit() {
        let transcript = parse(
            ParseOptions::default(),
            "[01.01.20, 10:00:00] A: first\nsecond line\n\nB: third",
        )
        .await;

        assert_eq!(transcript.len(), 4);
        let continuation = &transcript.events[2];
        assert_eq!(continuation.kind, EventKind::Notification);
        assert_eq!(continuation.text, "second line");
        assert_eq!(continuation.timestamp, transcript.events[1].timestamp);
        assert_eq!(continuation.time_of_day, "10:00");

        let inherited = &transcript.events[3];
        assert_eq!(inherited.kind, EventKind::Message);
        assert_eq!(inherited.speaker(), Some("B"));
        assert_eq!(inherited.timestamp, transcript.events[1].timestamp);
    }

    #[tokio::test]
    async fn test_lines_before_first_timestamp_use_fallback() {
        let transcript = parse(ParseOptions::default(), "preamble").await;

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.events[0].timestamp, pinned().timestamp());
        assert_eq!(transcript.events[0].time_of_day, "12:34");
    }

    #[tokio::test]
    async fn test_stamped_empty_line() {
        let transcript = parse(ParseOptions::default(), "[01.01.20, 10:00:00]   ").await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.events[1].kind, EventKind::Notification);
        assert_eq!(transcript.events[1].text, "");
    }

    #[tokio::test]
    async fn test_personal_title_last_writer_wins() {
        let me = identity_hash("Me");
        let transcript = parse(
            ParseOptions::default().with_identity_hash(me),
            "[01.01.20, 10:00:00] Jane: hi\n[01.01.20, 10:01:00] Me: hey\n[01.01.20, 10:02:00] Joe: hello",
        )
        .await;

        assert_eq!(transcript.title, "Joe");
        assert_eq!(transcript.events[2].is_self, Some(true));
    }

    #[tokio::test]
    async fn test_personal_title_without_other_speaker() {
        let me = identity_hash("Me");
        let transcript = parse(
            ParseOptions::default().with_identity_hash(me.clone()),
            "[01.01.20, 10:00:00] Me: talking to myself",
        )
        .await;

        assert_eq!(transcript.title, PERSONAL_TITLE);
        assert_eq!(transcript.self_identity, me);
    }

    #[tokio::test]
    async fn test_missing_attachment_uses_last_speaker() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = parse(
            ParseOptions::new(dir.path()),
            "[01.01.20, 10:00:00] Jane: look\n[01.01.20, 10:01:00] <attached: photo.jpg>",
        )
        .await;

        let event = &transcript.events[2];
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.speaker(), Some("Jane"));
        assert_eq!(event.text, "Media file attached (file missing)");
        assert_eq!(event.time_of_day, "10:01");
        assert_eq!(event.media_path(), Some(dir.path().join("photo.jpg").as_path()));
    }

    #[tokio::test]
    async fn test_attachment_speaker_prefix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"jpg").unwrap();

        let transcript = parse(
            ParseOptions::new(dir.path()).with_group(true),
            "[01.01.20, 10:00:00] Jane: hi\n[01.01.20, 10:01:00] Bob: <attached: a.jpg>",
        )
        .await;

        let event = &transcript.events[2];
        assert_eq!(event.speaker(), Some("Bob"));
        assert_eq!(event.text, "Media file attached");
    }

    #[tokio::test]
    async fn test_attachment_before_any_speaker() {
        let transcript = parse(
            ParseOptions::new("/nonexistent"),
            "[01.01.20, 10:00:00] <attached: a.jpg>",
        )
        .await;
        assert_eq!(transcript.events[1].speaker(), Some(UNKNOWN_SPEAKER));
    }

    #[tokio::test]
    async fn test_excluded_attachment_emits_nothing() {
        let transcript = parse(
            ParseOptions::new("/nonexistent").with_exclude_media(true),
            "[01.01.20, 10:00:00] <attached: a.jpg>\n[02.01.20, 10:00:00] A: hi",
        )
        .await;

        assert_eq!(transcript.len(), 2);
        assert!(transcript.events[0].is_date_change());
        assert_eq!(
            transcript.events[0].date_label.as_deref(),
            Some("2 January 2020")
        );
        assert_eq!(transcript.media_events().count(), 0);
    }

    #[tokio::test]
    async fn test_excluded_attachment_leaves_clock_alone() {
        let transcript = parse(
            ParseOptions::new("/nonexistent").with_exclude_media(true),
            "[01.01.20, 10:00:00] A: hi\n[02.01.20, 11:30:00] <attached: x.jpg>\ncontinued caption",
        )
        .await;

        assert_eq!(transcript.len(), 3);
        let caption = &transcript.events[2];
        assert_eq!(caption.kind, EventKind::Notification);
        assert_eq!(caption.text, "continued caption");
        assert_eq!(caption.timestamp, 1_577_872_800);
        assert_eq!(caption.time_of_day, "10:00");
        assert_eq!(
            transcript.events.iter().filter(|e| e.is_date_change()).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_conversion_requires_transcoder() {
        let err = parser(ParseOptions::default().with_convert_media(true))
            .parse_str("[01.01.20, 10:00:00] A: hi")
            .await
            .unwrap_err();

        assert!(err.is_transcoder_unavailable());
        assert_eq!(
            err.to_string(),
            "ffmpeg is not installed or not available in the PATH"
        );
    }

    #[tokio::test]
    async fn test_crlf_and_bom() {
        let transcript = parse(
            ParseOptions::default(),
            "\u{feff}[01.01.20, 10:00:00] A: one\r\n[01.01.20, 10:00:01] B: two\r\n",
        )
        .await;

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.events[1].text, "one");
        assert_eq!(transcript.events[2].text, "two");
    }

    #[tokio::test]
    async fn test_parse_file_missing() {
        let err = parser(ParseOptions::default())
            .parse_file("/definitely/not/here/_chat.txt")
            .await
            .unwrap_err();
        assert!(err.is_input_not_found());
    }

    #[tokio::test]
    async fn test_step_returns_emitted_events() {
        let parser = parser(ParseOptions::default());
        let resolver = parser.resolver();
        let mut state = ScanState::new(false, pinned());

        let first = parser
            .step(&mut state, &resolver, "[01.01.20, 10:00:00] A: hi")
            .await;
        assert_eq!(first.len(), 2);

        let second = parser
            .step(&mut state, &resolver, "[01.01.20, 10:05:00] A: again")
            .await;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].sequence_index, 2);
        assert_eq!(state.emitted(), 3);
        assert_eq!(state.last_speaker(), "A");
        assert_eq!(state.title(), "A");
    }

    #[test]
    fn test_invalid_pattern() {
        let err =
            TranscriptParser::new(ParseOptions::default().with_timestamp_pattern("^(")).unwrap_err();
        assert!(err.is_configuration());
    }
}
