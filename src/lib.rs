//! # Chatlog
//!
//! A Rust library for turning exported chat transcripts into structured,
//! typed event logs.
//!
//! ## Overview
//!
//! An export is a plain-text transcript (`_chat.txt`) where new messages start
//! with a bracketed timestamp, next to the media files it references:
//!
//! ```text
//! [01.01.20, 10:00:00] John Doe: Hello World!
//! [01.01.20, 10:01:00] Jane Doe: <attached: 00000003-AUDIO-2020-01-01.opus>
//! ```
//!
//! Chatlog parses it into an ordered list of [`Event`]s (messages, calendar
//! day changes, notifications), resolves attachments against the media
//! folder (optionally converting voice notes and validating files), marks the
//! transcript owner's messages, and fingerprints the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let options = ParseOptions::new("./export")
//!         .with_identity_hash(identity_hash("John Doe"))
//!         .with_convert_media(true);
//!
//!     let transcript = TranscriptParser::new(options)?
//!         .parse_file("./export/_chat.txt")
//!         .await?;
//!
//!     println!("{}: {} events", transcript.title, transcript.len());
//!     write_json(&transcript, "chat.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`TranscriptParser`](parser::TranscriptParser), the line state machine
//! - [`parsing`] - timestamp recognition, line classification, identity and day tracking
//! - [`media`] - [`AttachmentResolver`](media::AttachmentResolver) and the
//!   transcoder/validator traits with their `ffmpeg`/`exiftool` implementations
//! - [`event`] - [`Event`], [`Transcript`]
//! - [`config`] - [`ParseOptions`](config::ParseOptions), [`MediaToolsConfig`](config::MediaToolsConfig)
//! - [`output`] / [`format`] - JSON, TXT and HTML rendering
//! - `archive` - zip extraction and transcript discovery (feature `archive`)
//! - `cli` - command-line arguments (feature `cli`)
//! - [`error`] - [`ChatlogError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "archive")]
pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod media;
pub mod output;
pub mod parser;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use error::{ChatlogError, Result};
pub use event::{Event, EventKind, Transcript};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlog::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ChatlogError, Result};
    pub use crate::event::{Event, EventKind, Transcript};

    pub use crate::config::{MediaToolsConfig, ParseOptions};
    pub use crate::parser::TranscriptParser;
    pub use crate::parsing::{identity_hash, is_valid_identity_hash};

    pub use crate::media::{
        AttachmentOutcome, AttachmentResolver, ExifToolValidator, FfmpegTranscoder,
        MediaTranscoder, MediaValidator,
    };

    pub use crate::format::{OutputFormat, write_to_format};
    pub use crate::output::{OutputConfig, to_html, to_json, to_txt, write_html, write_json, write_txt};

    #[cfg(feature = "archive")]
    pub use crate::archive::{extract_archive, find_transcript};
}
