//! Output writers for parsed transcripts.
//!
//! - [`write_json`] / [`to_json`] - the whole [`Transcript`], pretty-printed
//! - [`write_txt`] / [`to_txt`] - one line per event
//! - [`write_html`] / [`to_html`] - a standalone page with inline media
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatlog::Result<()> {
//! use chatlog::output::{OutputConfig, to_txt, write_json};
//! use chatlog::{Event, Transcript};
//!
//! let events = vec![Event::message("Alice", "Hello!", 1577872800, "10:00")];
//! let transcript = Transcript::new(false, "Alice", "", events)?;
//!
//! write_json(&transcript, "chat.json")?;
//! let text = to_txt(&transcript, &OutputConfig::new());
//! assert_eq!(text, "1/1/2020, 10:00:00 AM - Alice: Hello!");
//! # Ok(())
//! # }
//! ```

mod html_writer;
mod json_writer;
mod txt_writer;

pub use html_writer::{to_html, write_html};
pub use json_writer::{to_json, write_json};
pub use txt_writer::{to_txt, write_txt};

/// Stand-in for media when it was not kept.
pub const MEDIA_NOT_SAVED: &str = "[Media file not saved]";

/// Controls how events are rendered in text formats.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Render media events as [`MEDIA_NOT_SAVED`] instead of their path
    pub exclude_media: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_exclude_media(mut self, exclude: bool) -> Self {
        self.exclude_media = exclude;
        self
    }
}
