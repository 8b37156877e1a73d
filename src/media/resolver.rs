//! Turns an attachment reference into an outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{MediaTranscoder, MediaValidator};

/// Text of an attachment that resolved cleanly.
pub const MEDIA_ATTACHED_TEXT: &str = "Media file attached";
/// Text of an attachment whose conversion failed.
pub const CONVERSION_FAILED_TEXT: &str = "Media file attached (conversion failed)";
/// Text of an attachment whose file is not in the media directory.
pub const MISSING_MEDIA_TEXT: &str = "Media file attached (file missing)";
/// Text of an attachment the validator rejected.
pub const INVALID_MEDIA_TEXT: &str = "Media file attached (invalid media)";

/// What became of one attachment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Media is excluded; the line yields no event.
    Excluded,
    /// File present (and converted, when requested).
    Attached {
        /// Final path, pointing at the converted file if there is one
        path: PathBuf,
    },
    /// The transcoder failed; the original file is kept.
    ConversionFailed {
        /// Path of the unconverted file
        original: PathBuf,
    },
    /// The file does not exist.
    Missing {
        /// Path that was probed
        path: PathBuf,
    },
    /// The validator rejected the file.
    Invalid {
        /// Path that was validated
        path: PathBuf,
    },
}

impl AttachmentOutcome {
    /// Message text for the event, `None` when excluded.
    pub fn text(&self) -> Option<&'static str> {
        match self {
            AttachmentOutcome::Excluded => None,
            AttachmentOutcome::Attached { .. } => Some(MEDIA_ATTACHED_TEXT),
            AttachmentOutcome::ConversionFailed { .. } => Some(CONVERSION_FAILED_TEXT),
            AttachmentOutcome::Missing { .. } => Some(MISSING_MEDIA_TEXT),
            AttachmentOutcome::Invalid { .. } => Some(INVALID_MEDIA_TEXT),
        }
    }

    /// Path recorded on the event, `None` when excluded.
    pub fn media_path(&self) -> Option<&Path> {
        match self {
            AttachmentOutcome::Excluded => None,
            AttachmentOutcome::Attached { path }
            | AttachmentOutcome::Missing { path }
            | AttachmentOutcome::Invalid { path } => Some(path),
            AttachmentOutcome::ConversionFailed { original } => Some(original),
        }
    }
}

/// Resolves attachment references against a media directory.
///
/// Never fails: every problem with an individual file is reported as an
/// [`AttachmentOutcome`] and logged.
pub struct AttachmentResolver {
    media_dir: PathBuf,
    convert: bool,
    exclude: bool,
    source_extension: String,
    target_extension: String,
    transcoder: Arc<dyn MediaTranscoder>,
    validator: Option<Arc<dyn MediaValidator>>,
}

impl AttachmentResolver {
    /// Creates a resolver that only checks for existence.
    pub fn new(media_dir: impl Into<PathBuf>, transcoder: Arc<dyn MediaTranscoder>) -> Self {
        Self {
            media_dir: media_dir.into(),
            convert: false,
            exclude: false,
            source_extension: "opus".to_string(),
            target_extension: "mp3".to_string(),
            transcoder,
            validator: None,
        }
    }

    /// Enables conversion of the source extension.
    #[must_use]
    pub fn with_convert(mut self, convert: bool) -> Self {
        self.convert = convert;
        self
    }

    /// Enables exclusion of all attachments.
    #[must_use]
    pub fn with_exclude(mut self, exclude: bool) -> Self {
        self.exclude = exclude;
        self
    }

    /// Sets which extension gets converted and into what (without dots).
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

    /// Validates every attachment with `validator`.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn MediaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Absolute path of `reference` inside the media directory.
    pub fn resolve_path(&self, reference: &str) -> PathBuf {
        let joined = self.media_dir.join(reference.trim());
        std::path::absolute(&joined).unwrap_or(joined)
    }

    /// Resolves one reference, transcoding and validating as configured.
    pub async fn resolve(&self, reference: &str) -> AttachmentOutcome {
        if self.exclude {
            debug!(reference, "attachment excluded");
            return AttachmentOutcome::Excluded;
        }

        let path = self.resolve_path(reference);
        if !path.exists() {
            warn!(path = %path.display(), "attachment file missing");
            return AttachmentOutcome::Missing { path };
        }

        let path = if self.convert && self.is_convertible(&path) {
            let dest = path.with_extension(&self.target_extension);
            match self.transcoder.transcode(&path, &dest).await {
                Ok(()) => dest,
                Err(e) => {
                    warn!(error = %e, "attachment conversion failed");
                    return AttachmentOutcome::ConversionFailed { original: path };
                }
            }
        } else {
            path
        };

        if !path.exists() {
            warn!(path = %path.display(), "converted attachment not found");
            return AttachmentOutcome::Missing { path };
        }

        if let Some(validator) = &self.validator {
            if !validator.validate(&path).await {
                warn!(path = %path.display(), "attachment failed validation");
                return AttachmentOutcome::Invalid { path };
            }
        }

        AttachmentOutcome::Attached { path }
    }

    fn is_convertible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.source_extension))
    }
}

impl std::fmt::Debug for AttachmentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentResolver")
            .field("media_dir", &self.media_dir)
            .field("convert", &self.convert)
            .field("exclude", &self.exclude)
            .field("source_extension", &self.source_extension)
            .field("target_extension", &self.target_extension)
            .field("transcoder", &self.transcoder.name())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
