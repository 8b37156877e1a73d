//! Output format selection.
//!
//! Library-first format type without CLI framework dependencies.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> chatlog::Result<()> {
//! use chatlog::format::{OutputFormat, write_to_format};
//! use chatlog::output::OutputConfig;
//! use chatlog::{Event, Transcript};
//!
//! let events = vec![Event::message("Alice", "Hello!", 1577872800, "10:00")];
//! let transcript = Transcript::new(false, "Alice", "", events)?;
//!
//! let format = OutputFormat::from_path("chat.html")?;
//! write_to_format(&transcript, "chat.html", format, &OutputConfig::new())?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatlogError, Result};
use crate::event::Transcript;
use crate::output::OutputConfig;

/// Output format for parsed transcripts.
///
/// # Example
///
/// ```rust
/// use chatlog::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("html").unwrap();
/// assert_eq!(format, OutputFormat::Html);
/// assert_eq!(format.extension(), "html");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// The full transcript as JSON (default)
    #[default]
    Json,

    /// One line per event
    Txt,

    /// Standalone page with inline audio and images
    Html,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
            OutputFormat::Html => "html",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "txt", "html"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Txt, OutputFormat::Html]
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatlog::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("out/chat.TXT").unwrap();
    /// assert_eq!(format, OutputFormat::Txt);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "txt" => Ok(OutputFormat::Txt),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(ChatlogError::unknown_format(
                format!(".{ext}"),
                OutputFormat::all_names(),
            )),
        }
    }

    /// File name this format is written to (`chat.<ext>`).
    pub fn file_name(&self) -> String {
        format!("chat.{}", self.extension())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Txt => write!(f, "TXT"),
            OutputFormat::Html => write!(f, "HTML"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ChatlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Txt),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(ChatlogError::unknown_format(s, OutputFormat::all_names())),
        }
    }
}

/// Writes a transcript to a file in the specified format.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_to_format(
    transcript: &Transcript,
    path: impl AsRef<Path>,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    match format {
        OutputFormat::Json => crate::output::write_json(transcript, path),
        OutputFormat::Txt => crate::output::write_txt(transcript, path, config),
        OutputFormat::Html => crate::output::write_html(transcript, path, config),
    }
}

/// Converts a transcript to a string in the specified format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_format_string(
    transcript: &Transcript,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        OutputFormat::Json => crate::output::to_json(transcript),
        OutputFormat::Txt => Ok(crate::output::to_txt(transcript, config)),
        OutputFormat::Html => Ok(crate::output::to_html(transcript, config)),
    }
}
