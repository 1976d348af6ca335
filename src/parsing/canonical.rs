//! Reading canonical message files back.
//!
//! A canonical file is the pretty JSON array written by
//! [`write_json`](crate::core::output::write_json). It is the input of day
//! splitting.

use std::fs;
use std::path::Path;

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

/// Loads a canonical JSON array from disk.
///
/// # Errors
///
/// Returns [`ChatnormError::Io`] if the file cannot be read and
/// [`ChatnormError::Parse`] if it is not a JSON array of messages.
pub fn load_canonical(path: impl AsRef<Path>) -> Result<Vec<CanonicalMessage>, ChatnormError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ChatnormError::canonical_parse(e, Some(path.to_path_buf())))
}

/// Parses a canonical JSON array from a string.
pub fn parse_canonical_str(content: &str) -> Result<Vec<CanonicalMessage>, ChatnormError> {
    serde_json::from_str(content).map_err(|e| ChatnormError::canonical_parse(e, None))
}
