//! Leading timestamp recognition.
//!
//! Exports prefix every new message with a bracketed timestamp, e.g.
//! `[15.01.24, 10:30:45] Alice: Hello`. Continuation lines (multi-line bodies,
//! captions) carry no prefix and are reported as [`Recognized::Unstamped`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::{Captures, Regex};

use crate::config::DEFAULT_TIMESTAMP_PATTERN;
use crate::error::{ChatlogError, Result};

const REQUIRED_GROUPS: [&str; 6] = ["day", "month", "year", "hour", "minute", "second"];

/// Outcome of looking for a timestamp at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognized<'a> {
    /// The line starts with a valid timestamp.
    Stamped {
        /// Normalized instant
        at: DateTime<Utc>,
        /// Line with the prefix removed, trimmed
        remainder: &'a str,
        /// `HH:MM`
        time_of_day: String,
    },
    /// No timestamp prefix.
    Unstamped,
    /// The prefix matched but names an impossible date or time.
    InvalidDate {
        /// The matched prefix
        prefix: &'a str,
    },
}

/// Compiled timestamp pattern.
///
/// # Example
///
/// ```rust
/// use chatlog::parsing::{Recognized, TimestampRecognizer};
///
/// let recognizer = TimestampRecognizer::new();
/// match recognizer.recognize("[01.01.20, 10:00:00] John Doe: Hello World!") {
///     Recognized::Stamped { remainder, time_of_day, .. } => {
///         assert_eq!(remainder, "John Doe: Hello World!");
///         assert_eq!(time_of_day, "10:00");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TimestampRecognizer {
    regex: Regex,
}

impl TimestampRecognizer {
    /// Creates a recognizer for the default bracketed pattern.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(DEFAULT_TIMESTAMP_PATTERN).expect("default pattern compiles"),
        }
    }

    /// Creates a recognizer for a custom pattern.
    ///
    /// The pattern must define the named groups `day`, `month`, `year`,
    /// `hour`, `minute` and `second`; it should be anchored with `^`.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ChatlogError::invalid_pattern(pattern, e.to_string()))?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        if let Some(missing) = REQUIRED_GROUPS.iter().find(|g| !names.contains(g)) {
            return Err(ChatlogError::invalid_pattern(
                pattern,
                format!("missing named group '{missing}'"),
            ));
        }

        Ok(Self { regex })
    }

    /// Looks for a timestamp at the start of `line`.
    pub fn recognize<'a>(&self, line: &'a str) -> Recognized<'a> {
        let Some(caps) = self.regex.captures(line) else {
            return Recognized::Unstamped;
        };
        let Some(whole) = caps.get(0) else {
            return Recognized::Unstamped;
        };

        match parts(&caps) {
            Some((date, time)) => Recognized::Stamped {
                at: date.and_time(time).and_utc(),
                remainder: line[whole.end()..].trim(),
                time_of_day: time.format("%H:%M").to_string(),
            },
            None => Recognized::InvalidDate {
                prefix: whole.as_str(),
            },
        }
    }
}

impl Default for TimestampRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a calendar date and clock time from the captured groups.
///
/// Two-digit years are taken as 20YY.
fn parts(caps: &Captures<'_>) -> Option<(NaiveDate, NaiveTime)> {
    let num = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();

    let year_str = caps.name("year")?.as_str();
    let year = year_str.parse::<i32>().ok()?;
    let year = if year_str.len() == 2 { 2000 + year } else { year };

    let date = NaiveDate::from_ymd_opt(year, num("month")?, num("day")?)?;
    let time = NaiveTime::from_hms_opt(num("hour")?, num("minute")?, num("second")?)?;
    Some((date, time))
}
