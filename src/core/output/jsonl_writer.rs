//! JSON Lines (JSONL) output writer.
//!
//! One canonical record per line, convenient for line-oriented tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

/// Writes messages to a JSONL file.
///
/// # Format
/// ```text
/// {"author":"Me","timestamp":"2023-11-15T03:43:20+05:30","text":"hi","media":false,"reply_to":null}
/// {"author":"Them","timestamp":"2023-11-15T03:45:00+05:30","text":"ok","media":false,"reply_to":"hi"}
/// ```
pub fn write_jsonl(
    messages: &[CanonicalMessage],
    output_path: impl AsRef<Path>,
) -> Result<(), ChatnormError> {
    let path = output_path.as_ref();
    let file = File::create(path).map_err(|e| ChatnormError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    for msg in messages {
        serde_json::to_writer(&mut writer, msg)?;
        writer
            .write_all(b"\n")
            .map_err(|e| ChatnormError::write(path, e))?;
    }

    writer.flush().map_err(|e| ChatnormError::write(path, e))?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[CanonicalMessage]) -> Result<String, ChatnormError> {
    let mut output = String::new();
    for msg in messages {
        output.push_str(&serde_json::to_string(msg)?);
        output.push('\n');
    }
    Ok(output)
}
