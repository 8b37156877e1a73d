//! Line-level building blocks used by [`TranscriptParser`](crate::parser::TranscriptParser).
//!
//! Each piece looks at one line (or one speaker) in isolation; the parser
//! threads them together with the state carried between lines.

pub mod identity;
pub mod line;
pub mod timestamp;

pub use identity::{DayTracker, Identity, date_label, identity_hash, is_valid_identity_hash};
pub use line::{LineContent, classify};
pub use timestamp::{Recognized, TimestampRecognizer};
