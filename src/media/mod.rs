//! Attachment handling.
//!
//! Attachments are resolved against the media directory, optionally
//! transcoded and validated by external tools. The tools sit behind
//! [`MediaTranscoder`] and [`MediaValidator`] so they can be swapped out
//! (tests use in-process fakes).
//!
//! # Example
//!
//! ```rust,no_run
//! use chatlog::media::{FfmpegTranscoder, MediaTranscoder};
//!
//! # async fn example() {
//! let ffmpeg = FfmpegTranscoder::new();
//! if !ffmpeg.is_available().await {
//!     eprintln!("{} not found", ffmpeg.name());
//! }
//! # }
//! ```

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

mod exiftool;
mod ffmpeg;
mod resolver;

pub use exiftool::ExifToolValidator;
pub use ffmpeg::FfmpegTranscoder;
pub use resolver::{
    AttachmentOutcome, AttachmentResolver, CONVERSION_FAILED_TEXT, INVALID_MEDIA_TEXT,
    MEDIA_ATTACHED_TEXT, MISSING_MEDIA_TEXT,
};

/// Converts one media file into another format.
#[async_trait]
pub trait MediaTranscoder: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Probes whether the tool can be run at all.
    async fn is_available(&self) -> bool;

    /// Writes a converted copy of `source` to `dest`, replacing `dest` if it exists.
    async fn transcode(&self, source: &Path, dest: &Path) -> Result<()>;
}

/// Checks that a media file is readable.
#[async_trait]
pub trait MediaValidator: Send + Sync {
    /// Returns `true` if `path` looks like a valid media file.
    async fn validate(&self, path: &Path) -> bool;
}
