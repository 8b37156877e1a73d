//! Unified error types for chatlog.
//!
//! Only pre-condition failures surface as [`ChatlogError`]. Problems confined
//! to a single line (an impossible date) or a single attachment (missing file,
//! failed conversion) are logged and degrade to placeholder output instead;
//! see [`AttachmentOutcome`](crate::media::AttachmentOutcome).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlog operations.
///
/// # Example
///
/// ```rust
/// use chatlog::error::Result;
/// use chatlog::Event;
///
/// fn my_function() -> Result<Vec<Event>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlogError>;

/// The error type for all chatlog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlogError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The transcript cannot be read
    /// - The output directory is not writable
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript (or archive) passed in does not exist.
    #[error("Input file does not exist: {}", path.display())]
    InputNotFound {
        /// The path that was requested
        path: PathBuf,
    },

    /// No transcript file was found in a directory.
    #[error("No chat transcript found in {}", dir.display())]
    TranscriptNotFound {
        /// The directory that was searched
        dir: PathBuf,
    },

    /// Conversion was requested but the transcoding tool cannot be run.
    #[error("{tool} is not installed or not available in the PATH")]
    TranscoderUnavailable {
        /// Name of the missing tool
        tool: String,
    },

    /// A single transcoding run failed.
    ///
    /// The parser never propagates this; it degrades the attachment to a
    /// "conversion failed" event.
    #[error("Conversion failed for {}: {message}", path.display())]
    Transcode {
        /// The source file
        path: PathBuf,
        /// What the tool reported
        message: String,
    },

    /// The caller-supplied identity hash is not a 32-character hex digest.
    #[error("Invalid identity hash '{input}'. Expected {expected}")]
    InvalidIdentityHash {
        /// The rejected value
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The configured timestamp pattern cannot be used.
    #[error("Invalid timestamp pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as configured
        pattern: String,
        /// Why it was rejected
        message: String,
    },

    /// Unknown output format name.
    #[error("Unknown format: '{input}'. Expected one of: {expected}")]
    UnknownFormat {
        /// The rejected name
        input: String,
        /// Accepted names
        expected: String,
    },

    /// Zip archive error.
    #[cfg(feature = "archive")]
    #[error("Failed to extract {}: {source}", path.display())]
    Archive {
        /// The archive being extracted
        path: PathBuf,
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlogError {
    /// Creates a missing-input error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        ChatlogError::InputNotFound { path: path.into() }
    }

    /// Creates a transcript-not-found error.
    pub fn transcript_not_found(dir: impl Into<PathBuf>) -> Self {
        ChatlogError::TranscriptNotFound { dir: dir.into() }
    }

    /// Creates a transcoder-unavailable error.
    pub fn transcoder_unavailable(tool: impl Into<String>) -> Self {
        ChatlogError::TranscoderUnavailable { tool: tool.into() }
    }

    /// Creates a transcode error for a single file.
    pub fn transcode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ChatlogError::Transcode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid identity hash error.
    pub fn invalid_identity_hash(input: impl Into<String>) -> Self {
        ChatlogError::InvalidIdentityHash {
            input: input.into(),
            expected: "a 32-character hex MD5 digest",
        }
    }

    /// Creates an invalid timestamp pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        ChatlogError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown format error.
    pub fn unknown_format(input: impl Into<String>, expected: &[&str]) -> Self {
        ChatlogError::UnknownFormat {
            input: input.into(),
            expected: expected.join(", "),
        }
    }

    /// Wraps a zip error with the archive path.
    #[cfg(feature = "archive")]
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ChatlogError::Archive {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlogError::Io(_))
    }

    /// Returns `true` if the input file was missing.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, ChatlogError::InputNotFound { .. })
    }

    /// Returns `true` if the transcoder was unavailable.
    pub fn is_transcoder_unavailable(&self) -> bool {
        matches!(self, ChatlogError::TranscoderUnavailable { .. })
    }

    /// Returns `true` if this is a configuration problem the caller can fix
    /// before retrying (bad hash, bad pattern, unknown format).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ChatlogError::InvalidIdentityHash { .. }
                | ChatlogError::InvalidPattern { .. }
                | ChatlogError::UnknownFormat { .. }
                | ChatlogError::TranscoderUnavailable { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
