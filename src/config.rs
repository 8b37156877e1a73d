//! Configuration types for parsing and media handling.
//!
//! These are plain structs for library usage, without any CLI framework
//! dependencies.
//!
//! - [`ParseOptions`] - what the caller knows about the transcript and how
//!   attachments should be treated
//! - [`MediaToolsConfig`] - which external tools handle media and which
//!   extension gets converted
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::ParseOptions;
//!
//! let options = ParseOptions::new("./extracted")
//!     .with_group(true)
//!     .with_convert_media(true);
//!
//! assert!(options.is_group);
//! assert!(!options.exclude_media);
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default bracketed timestamp: `[D.M.YY, H:MM:SS]` with `.`, `/` or `-`
/// between the date parts and a 2- or 4-digit year.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = r"^\[(?P<day>\d{1,2})[./-](?P<month>\d{1,2})[./-](?P<year>\d{4}|\d{2}), (?P<hour>\d{1,2}):(?P<minute>\d{2}):(?P<second>\d{2})\]";

/// Options for a single parse.
///
/// # Example
///
/// ```rust
/// use chatlog::config::ParseOptions;
/// use chatlog::parsing::identity_hash;
///
/// let options = ParseOptions::new("/tmp/chat")
///     .with_identity_hash(identity_hash("Alice"))
///     .with_exclude_media(true);
///
/// assert!(options.identity_hash.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Identity hash of the transcript owner (MD5 hex of a display name)
    pub identity_hash: Option<String>,

    /// Whether the transcript is a group chat (default: false)
    pub is_group: bool,

    /// Directory that attachment references are relative to
    pub media_dir: PathBuf,

    /// Convert the configured source audio format when found (default: false)
    pub convert_media: bool,

    /// Drop attachment lines entirely (default: false)
    pub exclude_media: bool,

    /// Check attachments with the media validator (default: false)
    pub validate_media: bool,

    /// Regex recognizing the leading timestamp
    pub timestamp_pattern: String,

    /// Timestamp used before the first dated line; wall clock when `None`
    pub fallback_time: Option<DateTime<Utc>>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            identity_hash: None,
            is_group: false,
            media_dir: PathBuf::from("."),
            convert_media: false,
            exclude_media: false,
            validate_media: false,
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            fallback_time: None,
        }
    }
}

impl ParseOptions {
    /// Creates options with attachments resolved against `media_dir`.
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the owner's identity hash.
    #[must_use]
    pub fn with_identity_hash(mut self, hash: impl Into<String>) -> Self {
        self.identity_hash = Some(hash.into());
        self
    }

    /// Marks the transcript as a group chat.
    #[must_use]
    pub fn with_group(mut self, is_group: bool) -> Self {
        self.is_group = is_group;
        self
    }

    /// Sets the attachment base directory.
    #[must_use]
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = dir.into();
        self
    }

    /// Enables or disables audio conversion.
    #[must_use]
    pub fn with_convert_media(mut self, convert: bool) -> Self {
        self.convert_media = convert;
        self
    }

    /// Enables or disables dropping attachment lines.
    #[must_use]
    pub fn with_exclude_media(mut self, exclude: bool) -> Self {
        self.exclude_media = exclude;
        self
    }

    /// Enables or disables media validation.
    #[must_use]
    pub fn with_validate_media(mut self, validate: bool) -> Self {
        self.validate_media = validate;
        self
    }

    /// Replaces the timestamp pattern.
    ///
    /// The pattern must define the named groups `day`, `month`, `year`,
    /// `hour`, `minute` and `second`.
    #[must_use]
    pub fn with_timestamp_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.timestamp_pattern = pattern.into();
        self
    }

    /// Pins the timestamp used for lines before the first dated one.
    #[must_use]
    pub fn with_fallback_time(mut self, at: DateTime<Utc>) -> Self {
        self.fallback_time = Some(at);
        self
    }

    /// Identity hash as stored in the transcript (empty when none was given).
    pub fn self_identity(&self) -> &str {
        self.identity_hash.as_deref().unwrap_or_default()
    }
}

/// External media tools and the conversion they perform.
///
/// # Example
///
/// ```rust
/// use chatlog::config::MediaToolsConfig;
///
/// let tools = MediaToolsConfig::new().with_transcoder_program("/opt/ffmpeg/bin/ffmpeg");
/// assert_eq!(tools.source_extension, "opus");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaToolsConfig {
    /// Transcoder executable (default: `ffmpeg`)
    pub transcoder_program: String,

    /// Metadata probe executable (default: `exiftool`)
    pub validator_program: String,

    /// Extension that gets converted, without dot (default: `opus`)
    pub source_extension: String,

    /// Extension produced by conversion, without dot (default: `mp3`)
    pub target_extension: String,
}

impl Default for MediaToolsConfig {
    fn default() -> Self {
        Self {
            transcoder_program: "ffmpeg".to_string(),
            validator_program: "exiftool".to_string(),
            source_extension: "opus".to_string(),
            target_extension: "mp3".to_string(),
        }
    }
}

impl MediaToolsConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transcoder executable.
    #[must_use]
    pub fn with_transcoder_program(mut self, program: impl Into<String>) -> Self {
        self.transcoder_program = program.into();
        self
    }

    /// Sets the metadata probe executable.
    #[must_use]
    pub fn with_validator_program(mut self, program: impl Into<String>) -> Self {
        self.validator_program = program.into();
        self
    }

    /// Sets the source and target extensions of the conversion.
    #[must_use]
    pub fn with_conversion(
        mut self,
        source_extension: impl Into<String>,
        target_extension: impl Into<String>,
    ) -> Self {
        self.source_extension = source_extension.into();
        self.target_extension = target_extension.into();
        self
    }
}
