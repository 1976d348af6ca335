//! Unified error types for chatnorm.
//!
//! This module provides a single [`ChatnormError`] enum covering every
//! failure that aborts a run. Per-record anomalies (an unparseable transcript
//! line, a message without a timestamp, a reply whose target is gone) are
//! *not* errors: they are absorbed where they happen and, at most, logged.
//!
//! # Failure classes
//!
//! - **Structural problems** with an input (missing `messages`, non-object
//!   top level, invalid JSON, unreadable file) abort the run with an error
//! - **Per-record problems** degrade locally (drop or placeholder)
//! - No partial output is ever written for a failed run

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatnorm operations.
///
/// # Example
///
/// ```rust
/// use chatnorm::error::Result;
/// use chatnorm::CanonicalMessage;
///
/// fn my_function() -> Result<Vec<CanonicalMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatnormError>;

/// The error type for all chatnorm operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatnormError {
    /// Reading an input failed (missing file, permissions).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An input was not valid JSON, or did not match the record shape.
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "WhatsApp JSON", "canonical JSON")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input doesn't have the expected structure.
    ///
    /// This occurs when:
    /// - The export's top level is not a non-empty object
    /// - The chat entry has no `messages` key
    /// - `messages` is not an object keyed by message id
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A user-supplied date did not match the expected pattern.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: String,
    },

    /// A date range whose start lies after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date
        start: chrono::NaiveDate,
        /// Requested end date
        end: chrono::NaiveDate,
    },

    /// A UTC offset string that could not be interpreted.
    #[error("Invalid UTC offset '{input}'. Expected format: +HH:MM or -HH:MM")]
    InvalidOffset {
        /// The offending input
        input: String,
    },

    /// Writing an output artifact failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Destination that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Malformed JSON text or a value of the wrong shape
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl From<std::string::FromUtf8Error> for ChatnormError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatnormError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatnormError {
    /// Creates a parse error for the WhatsApp JSON export format.
    pub fn export_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatnormError::Parse {
            format: "WhatsApp JSON export",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for a canonical message file.
    pub fn canonical_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatnormError::Parse {
            format: "canonical JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatnormError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error for the given expected pattern.
    pub fn invalid_date(input: impl Into<String>, expected: impl Into<String>) -> Self {
        ChatnormError::InvalidDate {
            input: input.into(),
            expected: expected.into(),
        }
    }

    /// Creates an invalid offset error.
    pub fn invalid_offset(input: impl Into<String>) -> Self {
        ChatnormError::InvalidOffset {
            input: input.into(),
        }
    }

    /// Creates a write error for the given destination.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatnormError::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatnormError::Io(_) | ChatnormError::Write { .. })
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatnormError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatnormError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(
            self,
            ChatnormError::InvalidDate { .. } | ChatnormError::InvalidRange { .. }
        )
    }
}
