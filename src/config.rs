//! Configuration types for parsing and normalization.
//!
//! Every knob that shapes the output of the pipeline lives in one of these
//! structs and is passed explicitly into the code that needs it. Nothing is
//! read from process-wide state, so the same core logic can be exercised
//! against several configurations side by side.
//!
//! - [`NormalizeConfig`] - author names, target timezone and reply placeholders
//! - [`TranscriptConfig`] - date pattern of text transcripts
//! - [`CleanConfig`] - token used by the transcript cleaner
//!
//! # Example
//!
//! ```rust
//! use chatnorm::config::NormalizeConfig;
//!
//! let config = NormalizeConfig::new()
//!     .with_author_me("Milind")
//!     .with_author_them("Ojou sama")
//!     .with_utc_offset("+05:30");
//!
//! assert_eq!(config.offset().unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
//! ```

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::ChatnormError;

/// Default display name for messages sent by the exporting account.
pub const DEFAULT_AUTHOR_ME: &str = "Me";

/// Default display name for messages sent by the other participant.
pub const DEFAULT_AUTHOR_THEM: &str = "Them";

/// Default target timezone (IST).
pub const DEFAULT_UTC_OFFSET: &str = "+05:30";

/// Placeholder used when a reply targets a message without a caption.
pub const MEDIA_REPLY_PLACEHOLDER: &str = "[Replied to a media message]";

/// Placeholder used when a reply targets a message absent from the export.
pub const MISSING_REPLY_PLACEHOLDER: &str = "[Replied to a message that could not be found]";

/// Default date pattern of text transcripts (`dd/mm/yyyy`).
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Default token removed by the transcript cleaner.
pub const DEFAULT_CLEAN_TOKEN: &str = "<Media omitted>";

/// Configuration for JSON export normalization.
///
/// # Example
///
/// ```rust
/// use chatnorm::config::NormalizeConfig;
///
/// let config = NormalizeConfig::new().with_utc_offset("+00:00");
/// assert_eq!(config.author_me, "Me");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Author name for messages with `from_me = true` (default: "Me")
    pub author_me: String,

    /// Author name for every other message (default: "Them")
    pub author_them: String,

    /// Target timezone as a fixed UTC offset, `+HH:MM` (default: "+05:30")
    pub utc_offset: String,

    /// `reply_to` text when the replied-to message has no caption
    pub media_reply_placeholder: String,

    /// `reply_to` text when the replied-to message is not in the export
    pub missing_reply_placeholder: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            author_me: DEFAULT_AUTHOR_ME.to_string(),
            author_them: DEFAULT_AUTHOR_THEM.to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            media_reply_placeholder: MEDIA_REPLY_PLACEHOLDER.to_string(),
            missing_reply_placeholder: MISSING_REPLY_PLACEHOLDER.to_string(),
        }
    }
}

impl NormalizeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used for the exporting account.
    #[must_use]
    pub fn with_author_me(mut self, name: impl Into<String>) -> Self {
        self.author_me = name.into();
        self
    }

    /// Sets the name used for the other participant.
    #[must_use]
    pub fn with_author_them(mut self, name: impl Into<String>) -> Self {
        self.author_them = name.into();
        self
    }

    /// Sets the target UTC offset (`+HH:MM`).
    #[must_use]
    pub fn with_utc_offset(mut self, offset: impl Into<String>) -> Self {
        self.utc_offset = offset.into();
        self
    }

    /// Sets the placeholder for replies to caption-less messages.
    #[must_use]
    pub fn with_media_reply_placeholder(mut self, text: impl Into<String>) -> Self {
        self.media_reply_placeholder = text.into();
        self
    }

    /// Sets the placeholder for replies whose target is missing.
    #[must_use]
    pub fn with_missing_reply_placeholder(mut self, text: impl Into<String>) -> Self {
        self.missing_reply_placeholder = text.into();
        self
    }

    /// Parses [`utc_offset`](Self::utc_offset) into a [`FixedOffset`].
    ///
    /// Accepts `+HH:MM`, `-HH:MM` and `+HHMM`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatnormError::InvalidOffset`] if the string is not an offset.
    pub fn offset(&self) -> Result<FixedOffset, ChatnormError> {
        self.utc_offset
            .trim()
            .parse::<FixedOffset>()
            .map_err(|_| ChatnormError::invalid_offset(&self.utc_offset))
    }
}

/// Configuration for text transcript parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// chrono pattern of the date before the first comma (default: `%d/%m/%Y`)
    pub date_format: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl TranscriptConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the date pattern.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Human-readable form of the date pattern, for prompts and errors.
    ///
    /// ```rust
    /// use chatnorm::config::TranscriptConfig;
    ///
    /// assert_eq!(TranscriptConfig::new().display_format(), "DD/MM/YYYY");
    /// ```
    pub fn display_format(&self) -> String {
        self.date_format
            .replace("%d", "DD")
            .replace("%m", "MM")
            .replace("%Y", "YYYY")
            .replace("%y", "YY")
    }
}

/// Configuration for the transcript cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Lines containing this token (case-insensitive) are removed
    pub token: String,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_CLEAN_TOKEN.to_string(),
        }
    }
}

impl CleanConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token to remove.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_config_default() {
        let config = NormalizeConfig::default();
        assert_eq!(config.author_me, "Me");
        assert_eq!(config.author_them, "Them");
        assert_eq!(config.utc_offset, "+05:30");
        assert_eq!(
            config.missing_reply_placeholder,
            "[Replied to a message that could not be found]"
        );
    }

    #[test]
    fn test_normalize_config_builder() {
        let config = NormalizeConfig::new()
            .with_author_me("Milind")
            .with_author_them("Ojou sama")
            .with_media_reply_placeholder("[media]")
            .with_missing_reply_placeholder("[gone]");

        assert_eq!(config.author_me, "Milind");
        assert_eq!(config.author_them, "Ojou sama");
        assert_eq!(config.media_reply_placeholder, "[media]");
        assert_eq!(config.missing_reply_placeholder, "[gone]");
    }

    #[test]
    fn test_offset_parsing() {
        let ist = NormalizeConfig::new().offset().unwrap();
        assert_eq!(ist.local_minus_utc(), 19800);

        let west = NormalizeConfig::new().with_utc_offset("-03:00").offset().unwrap();
        assert_eq!(west.local_minus_utc(), -3 * 3600);

        let utc = NormalizeConfig::new().with_utc_offset("+00:00").offset().unwrap();
        assert_eq!(utc.local_minus_utc(), 0);
    }

    #[test]
    fn test_offset_parsing_invalid() {
        let err = NormalizeConfig::new()
            .with_utc_offset("Asia/Kolkata")
            .offset()
            .unwrap_err();
        assert!(err.to_string().contains("Asia/Kolkata"));
    }

    #[test]
    fn test_normalize_config_serde_defaults() {
        let config: NormalizeConfig = serde_json::from_str(r#"{"author_me": "A"}"#).unwrap();
        assert_eq!(config.author_me, "A");
        assert_eq!(config.author_them, "Them");
    }

    #[test]
    fn test_transcript_config() {
        let config = TranscriptConfig::new();
        assert_eq!(config.date_format, "%d/%m/%Y");

        let us = TranscriptConfig::new().with_date_format("%m/%d/%y");
        assert_eq!(us.display_format(), "MM/DD/YY");
    }

    #[test]
    fn test_clean_config() {
        assert_eq!(CleanConfig::new().token, "<Media omitted>");
        assert_eq!(CleanConfig::new().with_token("deleted").token, "deleted");
    }
}
