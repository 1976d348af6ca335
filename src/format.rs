//! Output format selection.
//!
//! # Example
//!
//! ```rust
//! # fn example() -> chatnorm::Result<()> {
//! use chatnorm::format::{OutputFormat, to_format_string};
//! use chatnorm::CanonicalMessage;
//!
//! let messages = vec![CanonicalMessage::new("Me").with_text("Hello!")];
//!
//! let jsonl = to_format_string(&messages, OutputFormat::Jsonl)?;
//! assert_eq!(jsonl.lines().count(), 1);
//!
//! // Or detect the format from a file extension
//! let format = OutputFormat::from_path("daily.json")?;
//! assert_eq!(format, OutputFormat::Json);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

/// Output format for canonical messages and tables.
///
/// - [`Json`](OutputFormat::Json) - pretty array (default)
/// - [`Jsonl`](OutputFormat::Jsonl) - one JSON object per line
/// - [`Csv`](OutputFormat::Csv) - semicolon-delimited, requires `csv-output`
///
/// ```rust
/// use chatnorm::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("ndjson").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,

    /// JSON Lines, also known as NDJSON
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Every name accepted by [`FromStr`](std::str::FromStr), aliases included.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "jsonl", "ndjson", "csv"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Jsonl, OutputFormat::Csv]
    }

    /// Case-insensitive lookup shared by names and extensions.
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "jsonl" | "ndjson" => Some(OutputFormat::Jsonl),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    /// Picks the format matching the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatnormError::InvalidFormat`] for an unknown or missing extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChatnormError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Self::from_name(ext).ok_or_else(|| {
            ChatnormError::invalid_format(
                "output",
                format!("cannot infer a format from extension '.{ext}', use json, jsonl or csv"),
            )
        })
    }

    /// Error for a format whose writer was compiled out.
    pub(crate) fn missing_feature(format: OutputFormat) -> ChatnormError {
        ChatnormError::invalid_format(
            "output",
            format!("{format} output needs the 'csv-output' feature"),
        )
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown output format '{s}' (accepted: {})",
                OutputFormat::all_names().join(", ")
            )
        })
    }
}

/// Writes messages to a file in the specified format.
///
/// # Errors
///
/// Returns an error if the file cannot be written, or if CSV is requested
/// without the `csv-output` feature.
pub fn write_to_format(
    messages: &[CanonicalMessage],
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), ChatnormError> {
    match format {
        OutputFormat::Json => crate::core::output::write_json(messages, path),
        OutputFormat::Jsonl => crate::core::output::write_jsonl(messages, path),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(messages, path),
        #[allow(unreachable_patterns)]
        _ => Err(OutputFormat::missing_feature(format)),
    }
}

/// Converts messages to a string in the specified format.
pub fn to_format_string(
    messages: &[CanonicalMessage],
    format: OutputFormat,
) -> Result<String, ChatnormError> {
    match format {
        OutputFormat::Json => crate::core::output::to_json(messages),
        OutputFormat::Jsonl => crate::core::output::to_jsonl(messages),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(messages),
        #[allow(unreachable_patterns)]
        _ => Err(OutputFormat::missing_feature(format)),
    }
}
