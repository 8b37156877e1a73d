//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::event::Transcript;

/// Writes the transcript to a JSON file.
///
/// # Format
/// ```json
/// {
///   "groupChat": false,
///   "chatName": "Alice",
///   "me": "",
///   "hash": "…",
///   "chatLog": [{"type": "msg", "index": 0, "person": "Alice", "message": "Hello", …}]
/// }
/// ```
pub fn write_json(transcript: &Transcript, output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(transcript)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts the transcript to a pretty-printed JSON string.
pub fn to_json(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn sample() -> Transcript {
        let events = vec![
            Event::date_change("1 January 2020", 1_577_872_800, "10:00").with_index(0),
            Event::message("Alice", "Hello", 1_577_872_800, "10:00")
                .with_index(1)
                .with_is_self(false),
        ];
        Transcript::new(false, "Alice", "", events).unwrap()
    }

    #[test]
    fn test_to_json_basic() {
        let json = to_json(&sample()).unwrap();

        assert!(json.contains(r#""chatName": "Alice""#));
        assert!(json.contains(r#""type": "dchange""#));
        assert!(json.contains(r#""person": "Alice""#));
        assert!(json.contains(r#""fromMe": false"#));
        assert!(!json.contains("attachment"));
    }

    #[test]
    fn test_to_json_roundtrip() {
        let transcript = sample();
        let json = to_json(&transcript).unwrap();
        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, transcript);
    }

    #[test]
    fn test_write_json_basic() {
        let temp_file = NamedTempFile::new().unwrap();
        write_json(&sample(), temp_file.path()).unwrap();

        let mut content = String::new();
        std::fs::File::open(temp_file.path())
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.starts_with('{'));
        assert!(content.contains("chatLog"));
    }

    #[test]
    fn test_write_json_bad_path() {
        let err = write_json(&sample(), "/nonexistent/dir/chat.json").unwrap_err();
        assert!(err.is_io());
    }
}
