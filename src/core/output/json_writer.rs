//! JSON output writer.
//!
//! This is the canonical interchange format: a pretty-printed array with all
//! five fields present on every record and non-ASCII text kept as-is.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

/// Writes messages to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {
///     "author": "Me",
///     "timestamp": "2023-11-15T03:43:20+05:30",
///     "text": "hi",
///     "media": false,
///     "reply_to": null
///   }
/// ]
/// ```
pub fn write_json(
    messages: &[CanonicalMessage],
    output_path: impl AsRef<Path>,
) -> Result<(), ChatnormError> {
    let path = output_path.as_ref();
    let json = to_json(messages)?;
    let mut file = File::create(path).map_err(|e| ChatnormError::write(path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| ChatnormError::write(path, e))?;
    Ok(())
}

/// Converts messages to a pretty JSON array.
///
/// Same format as [`write_json`], but returns a String.
pub fn to_json(messages: &[CanonicalMessage]) -> Result<String, ChatnormError> {
    Ok(serde_json::to_string_pretty(messages)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_json_shape() {
        let messages = vec![
            CanonicalMessage::new("Me")
                .with_timestamp("2023-11-15T03:43:20+05:30")
                .with_text("hi"),
            CanonicalMessage::new("Them").with_media(true).with_reply_to("hi"),
        ];

        let json = to_json(&messages).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = parsed.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["author"], "Me");
        assert!(arr[0]["reply_to"].is_null());
        assert_eq!(arr[1]["media"], true);
        assert!(arr[1]["text"].is_null());
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn test_to_json_keeps_unicode() {
        let json = to_json(&[CanonicalMessage::new("Ojou sama").with_text("नमस्ते 👋")]).unwrap();
        assert!(json.contains("नमस्ते 👋"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_json() {
        let messages = vec![CanonicalMessage::new("Me").with_text("saved")];
        let temp_file = NamedTempFile::new().unwrap();

        write_json(&messages, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let back: Vec<CanonicalMessage> = serde_json::from_str(&content).unwrap();
        assert_eq!(back, messages);
    }
}
