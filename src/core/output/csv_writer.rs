//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

const HEADER: [&str; 5] = ["Timestamp", "Author", "Text", "Media", "ReplyTo"];

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Timestamp`, `Author`, `Text`, `Media`, `ReplyTo`
/// - Absent values are empty cells, `Media` is `true`/`false`
/// - Encoding: UTF-8
pub fn write_csv(
    messages: &[CanonicalMessage],
    output_path: impl AsRef<Path>,
) -> Result<(), ChatnormError> {
    let path = output_path.as_ref();
    let csv = to_csv(messages)?;
    let mut file = File::create(path).map_err(|e| ChatnormError::write(path, e))?;
    file.write_all(csv.as_bytes())
        .map_err(|e| ChatnormError::write(path, e))?;
    Ok(())
}

/// Converts messages to a CSV string.
pub fn to_csv(messages: &[CanonicalMessage]) -> Result<String, ChatnormError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for msg in messages {
        writer.write_record(build_record(msg))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn build_record(msg: &CanonicalMessage) -> [&str; 5] {
    [
        msg.timestamp.as_deref().unwrap_or_default(),
        &msg.author,
        msg.text.as_deref().unwrap_or_default(),
        if msg.media { "true" } else { "false" },
        msg.reply_to.as_deref().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_csv_basic() {
        let messages = vec![
            CanonicalMessage::new("Me")
                .with_timestamp("2023-11-15T03:43:20+05:30")
                .with_text("hello"),
            CanonicalMessage::new("Them").with_media(true).with_reply_to("hello"),
        ];

        let csv = to_csv(&messages).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Timestamp;Author;Text;Media;ReplyTo"));
        assert_eq!(lines.next(), Some("2023-11-15T03:43:20+05:30;Me;hello;false;"));
        assert_eq!(lines.next(), Some(";Them;;true;hello"));
    }

    #[test]
    fn test_to_csv_quotes_delimiter() {
        let csv = to_csv(&[CanonicalMessage::new("Me").with_text("a;b")]).unwrap();
        assert!(csv.contains("\"a;b\""));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "a;b");
    }

    #[test]
    fn test_write_csv() {
        let temp_file = NamedTempFile::new().unwrap();
        write_csv(&[CanonicalMessage::new("Me").with_text("hi")], temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains(";Me;hi;false;"));
    }
}
