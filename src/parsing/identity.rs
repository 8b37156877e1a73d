//! Speaker identity and calendar-day tracking.

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

/// Lowercase MD5 hex digest of a display name, as stored in
/// [`ParseOptions::identity_hash`](crate::config::ParseOptions::identity_hash).
///
/// ```rust
/// use chatlog::parsing::identity_hash;
///
/// assert_eq!(identity_hash("John Doe"), "4c2a904bafba06591225113ad17b5cec");
/// ```
pub fn identity_hash(name: &str) -> String {
    hex::encode(Md5::digest(name.as_bytes()))
}

/// Returns `true` if `hash` looks like an MD5 hex digest (32 hex chars, any case).
pub fn is_valid_identity_hash(hash: &str) -> bool {
    hash.len() == 32 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decides whether a speaker is the transcript owner.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    hash: Option<String>,
}

impl Identity {
    /// Creates an identity from an optional owner hash.
    pub fn new(hash: Option<&str>) -> Self {
        Self {
            hash: hash.filter(|h| !h.is_empty()).map(str::to_ascii_lowercase),
        }
    }

    /// Returns `true` if `speaker` hashes to the owner's hash.
    ///
    /// Always `false` when no hash was configured.
    pub fn is_self(&self, speaker: &str) -> bool {
        self.hash
            .as_deref()
            .is_some_and(|hash| identity_hash(speaker) == hash)
    }
}

/// `1 January 2020` style label for the calendar day of `at`.
pub fn date_label(at: DateTime<Utc>) -> String {
    at.format("%-d %B %Y").to_string()
}

/// Remembers the last calendar day seen and reports when it changes.
#[derive(Debug, Clone, Default)]
pub struct DayTracker {
    current: Option<String>,
}

impl DayTracker {
    /// Creates a tracker that has not seen any day yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `at` and returns its date label if it starts a new day.
    ///
    /// The first observation always starts a new day.
    pub fn observe(&mut self, at: DateTime<Utc>) -> Option<String> {
        let key = at.format("%Y-%m-%d").to_string();
        if self.current.as_deref() == Some(key.as_str()) {
            return None;
        }
        self.current = Some(key);
        Some(date_label(at))
    }
}
