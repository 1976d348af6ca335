//! Canonical message record produced by the normalizer.
//!
//! [`CanonicalMessage`] is the terminal artifact of the JSON pipeline. It is
//! handed to consumers (day splitting, output writers) as-is and never
//! mutated after emission.
//!
//! # Serialization
//!
//! All five fields are always present in JSON; absent values are `null`:
//!
//! ```
//! use chatnorm::CanonicalMessage;
//!
//! let msg = CanonicalMessage::new("Me").with_text("hi");
//! let json = serde_json::to_string(&msg)?;
//! assert_eq!(
//!     json,
//!     r#"{"author":"Me","timestamp":null,"text":"hi","media":false,"reply_to":null}"#
//! );
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::config::NormalizeConfig;

/// Which side of a two-party chat a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    /// The account the export was taken from (`from_me = true`)
    Me,
    /// The other participant
    Them,
}

impl Author {
    /// Picks the side from the raw `from_me` flag.
    pub fn from_flag(from_me: bool) -> Self {
        if from_me { Author::Me } else { Author::Them }
    }

    /// Resolves the display name configured for this side.
    pub fn display_name<'a>(&self, config: &'a NormalizeConfig) -> &'a str {
        match self {
            Author::Me => &config.author_me,
            Author::Them => &config.author_them,
        }
    }
}

/// A normalized message from a JSON chat export.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `author` | `String` | One of the two configured display names |
/// | `timestamp` | `Option<String>` | ISO-8601 with explicit offset |
/// | `text` | `Option<String>` | Message body, or caption for media |
/// | `media` | `bool` | Whether the message carried media |
/// | `reply_to` | `Option<String>` | Display content of the replied-to message |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    /// Display name of the sender.
    pub author: String,

    /// When the message was sent, e.g. `2023-11-15T03:43:20+05:30`.
    ///
    /// `None` when the raw epoch value could not be converted.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Text content of the message.
    #[serde(default)]
    pub text: Option<String>,

    /// Whether the message carried media.
    #[serde(default)]
    pub media: bool,

    /// Content of the message this one replies to.
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl CanonicalMessage {
    /// Creates a message with only the author set.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            timestamp: None,
            text: None,
            media: false,
            reply_to: None,
        }
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Builder method to set the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method to set the media flag.
    #[must_use]
    pub fn with_media(mut self, media: bool) -> Self {
        self.media = media;
        self
    }

    /// Builder method to set the reply content.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Returns `true` if the message carries nothing a reader could see:
    /// no text, no media and no reply context.
    pub fn is_empty(&self) -> bool {
        let blank = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);
        blank(&self.text) && !self.media && blank(&self.reply_to)
    }
}
