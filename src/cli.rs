//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//! - [`InputKind`] - What the input path points at

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{MediaToolsConfig, ParseOptions};
use crate::error::{ChatlogError, Result};
use crate::output::OutputConfig;
use crate::parsing::{identity_hash, is_valid_identity_hash};

/// Turn exported chat transcripts (and their media) into structured logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlog export.zip -o ./out
    chatlog export.zip -o ./out --me-name \"John Doe\" --convert-opus
    chatlog ./extracted --group -f html
    chatlog _chat.txt --me 4c2a904bafba06591225113ad17b5cec --no-media -f txt")]
pub struct Args {
    /// Export archive (.zip), extracted export folder, or transcript file
    pub input: PathBuf,

    /// Output folder (archives are extracted here too)
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Your identity hash (MD5 hex of your display name)
    #[arg(short, long, value_name = "HASH", conflicts_with = "me_name")]
    pub me: Option<String>,

    /// Your display name; hashed for you
    #[arg(long, value_name = "NAME")]
    pub me_name: Option<String>,

    /// The transcript is a group chat
    #[arg(short, long)]
    pub group: bool,

    /// Convert OPUS voice notes to MP3
    #[arg(long)]
    pub convert_opus: bool,

    /// Check attachments with exiftool
    #[arg(long)]
    pub validate_media: bool,

    /// Leave attachments out of the log
    #[arg(long)]
    pub no_media: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Transcoder executable
    #[arg(long, value_name = "PROGRAM", default_value = "ffmpeg")]
    pub ffmpeg: String,

    /// Media validator executable
    #[arg(long, value_name = "PROGRAM", default_value = "exiftool")]
    pub exiftool: String,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The identity hash to parse with, from `--me` or `--me-name`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InvalidIdentityHash`] if `--me` is not an MD5
    /// hex digest.
    pub fn identity_hash(&self) -> Result<Option<String>> {
        if let Some(hash) = &self.me {
            if !is_valid_identity_hash(hash) {
                return Err(ChatlogError::invalid_identity_hash(hash));
            }
            return Ok(Some(hash.clone()));
        }
        Ok(self.me_name.as_deref().map(identity_hash))
    }

    /// Parse options for a transcript whose media lives in `media_dir`.
    ///
    /// # Errors
    ///
    /// See [`identity_hash`](Self::identity_hash).
    pub fn parse_options(&self, media_dir: impl Into<PathBuf>) -> Result<ParseOptions> {
        let mut options = ParseOptions::new(media_dir)
            .with_group(self.group)
            .with_convert_media(self.convert_opus)
            .with_exclude_media(self.no_media)
            .with_validate_media(self.validate_media);
        if let Some(hash) = self.identity_hash()? {
            options = options.with_identity_hash(hash);
        }
        Ok(options)
    }

    /// External tool configuration.
    pub fn tools_config(&self) -> MediaToolsConfig {
        MediaToolsConfig::new()
            .with_transcoder_program(&self.ffmpeg)
            .with_validator_program(&self.exiftool)
    }

    /// Rendering configuration.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new().with_exclude_media(self.no_media)
    }

    /// Path of the file the log is written to.
    pub fn output_file(&self) -> PathBuf {
        let format: crate::format::OutputFormat = self.format.into();
        self.output.join(format.file_name())
    }
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use chatlog::cli::OutputFormat;
///
/// let format = OutputFormat::Html;
/// println!("Extension: {}", format.extension()); // "html"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full transcript as JSON (default)
    #[default]
    Json,

    /// Plain text, one line per event
    Txt,

    /// HTML page with inline audio and images
    Html,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Txt => crate::format::OutputFormat::Txt,
            OutputFormat::Html => crate::format::OutputFormat::Html,
        }
    }
}

/// What the input path points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A zip export to extract first
    Archive(PathBuf),
    /// An already extracted export folder
    Directory(PathBuf),
    /// The transcript file itself
    Transcript(PathBuf),
}

impl InputKind {
    /// Classifies `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InputNotFound`] if `path` does not exist.
    pub fn detect(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChatlogError::input_not_found(path));
        }
        if path.is_dir() {
            return Ok(InputKind::Directory(path.to_path_buf()));
        }

        let is_zip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
        if is_zip {
            Ok(InputKind::Archive(path.to_path_buf()))
        } else {
            Ok(InputKind::Transcript(path.to_path_buf()))
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Archive(_) => write!(f, "Archive"),
            InputKind::Directory(_) => write!(f, "Folder"),
            InputKind::Transcript(_) => write!(f, "Transcript"),
        }
    }
}
