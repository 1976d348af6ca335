//! JSON export normalization.
//!
//! Turns the raw message mapping of a [`ChatExport`](crate::parsing::ChatExport)
//! into a chronological sequence of [`CanonicalMessage`]s.
//!
//! # Algorithm
//!
//! 1. **Index** every record that declares a non-empty `key_id`. This pass
//!    finishes before any reply is resolved, because a reply may point at a
//!    message that sorts later.
//! 2. **Order** records by their raw epoch value (stable). If the values
//!    cannot be compared, a warning is logged and mapping order is used.
//! 3. **Transform** each record that has a timestamp:
//!    - `author` from `from_me`
//!    - `timestamp` via [`raw_to_iso_string`]
//!    - `text` is `data` when non-empty, otherwise `caption`
//!    - `reply_to` is resolved from `quoted_data`, then from the indexed
//!      target's caption, then from a placeholder
//! 4. **Drop** records with no text, no media and no reply context.
//!
//! # Example
//!
//! ```rust
//! use chatnorm::config::NormalizeConfig;
//! use chatnorm::core::normalizer::normalize;
//! use chatnorm::parsing::export::parse_export_str;
//!
//! let export = parse_export_str(r#"{"chat": {"messages": {
//!     "1": {"key_id": "k1", "timestamp": 1700000000, "from_me": true, "caption": "hi"},
//!     "2": {"reply": "k1", "timestamp": 1700000100, "from_me": false, "data": "ok"}
//! }}}"#)?;
//!
//! let messages = normalize(&export.messages, &NormalizeConfig::new())?;
//! assert_eq!(messages[1].reply_to.as_deref(), Some("hi"));
//! # Ok::<(), chatnorm::ChatnormError>(())
//! ```

use std::collections::HashMap;

use chrono::FixedOffset;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use crate::config::NormalizeConfig;
use crate::core::timestamp::raw_to_iso_string;
use crate::error::ChatnormError;
use crate::message::{Author, CanonicalMessage};
use crate::parsing::export::RawMessage;

/// Where a resolved `reply_to` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// The record's own `quoted_data`
    Quoted,
    /// The caption of the indexed target
    Indexed,
    /// Target found but without a caption
    MediaPlaceholder,
    /// Target not present in the export
    MissingPlaceholder,
}

/// Counters describing one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Records in the input mapping
    pub input: usize,
    /// Records excluded for lacking a timestamp
    pub skipped_no_timestamp: usize,
    /// Records dropped by the emptiness filter
    pub dropped_empty: usize,
    /// Records in the output sequence
    pub emitted: usize,
    /// Emitted records whose timestamp could not be converted
    pub timestamp_failures: usize,
    /// Replies resolved from `quoted_data`
    pub replies_quoted: usize,
    /// Replies resolved from the key index
    pub replies_indexed: usize,
    /// Replies resolved to the media placeholder
    pub replies_media_placeholder: usize,
    /// Replies resolved to the missing-message placeholder
    pub replies_missing: usize,
    /// Whether mapping order was used because sorting failed
    pub sort_fallback: bool,
}

impl NormalizeReport {
    fn count_reply(&mut self, source: ReplySource) {
        match source {
            ReplySource::Quoted => self.replies_quoted += 1,
            ReplySource::Indexed => self.replies_indexed += 1,
            ReplySource::MediaPlaceholder => self.replies_media_placeholder += 1,
            ReplySource::MissingPlaceholder => self.replies_missing += 1,
        }
    }
}

/// Normalizer bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct Normalizer<'c> {
    config: &'c NormalizeConfig,
    offset: FixedOffset,
}

impl<'c> Normalizer<'c> {
    /// Creates a normalizer, validating the configured UTC offset.
    ///
    /// # Errors
    ///
    /// Returns [`ChatnormError::InvalidOffset`] for a malformed offset.
    pub fn new(config: &'c NormalizeConfig) -> Result<Self, ChatnormError> {
        Ok(Self {
            config,
            offset: config.offset()?,
        })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &NormalizeConfig {
        self.config
    }

    /// Normalizes a raw message mapping.
    pub fn normalize(&self, messages: &IndexMap<String, RawMessage>) -> Vec<CanonicalMessage> {
        self.normalize_with_report(messages).0
    }

    /// Normalizes a raw message mapping and reports what happened.
    pub fn normalize_with_report(
        &self,
        messages: &IndexMap<String, RawMessage>,
    ) -> (Vec<CanonicalMessage>, NormalizeReport) {
        let mut report = NormalizeReport {
            input: messages.len(),
            ..NormalizeReport::default()
        };

        let index = build_key_index(messages);

        let ordered = chronological_order(messages).unwrap_or_else(|| {
            warn!("could not sort messages by timestamp, keeping export order");
            report.sort_fallback = true;
            messages.values().collect()
        });

        let mut output = Vec::with_capacity(ordered.len());
        for raw in ordered {
            let Some(timestamp) = raw.timestamp.as_ref().filter(|ts| ts.is_present()) else {
                report.skipped_no_timestamp += 1;
                continue;
            };

            let author = Author::from_flag(raw.is_from_me()).display_name(self.config);
            let timestamp = raw_to_iso_string(timestamp, &self.offset);
            if timestamp.is_none() {
                report.timestamp_failures += 1;
            }

            let reply_to = self.resolve_reply(raw, &index).map(|(text, source)| {
                report.count_reply(source);
                text
            });

            let message = CanonicalMessage {
                author: author.to_string(),
                timestamp,
                text: consolidate_text(raw),
                media: raw.has_media(),
                reply_to,
            };

            if message.is_empty() {
                report.dropped_empty += 1;
                continue;
            }
            output.push(message);
        }

        report.emitted = output.len();
        debug!(
            "normalized {} of {} messages ({} without timestamp, {} empty)",
            report.emitted, report.input, report.skipped_no_timestamp, report.dropped_empty
        );
        (output, report)
    }

    /// Resolves the display content of the message `raw` replies to.
    ///
    /// Returns `None` when `raw` is not a reply.
    pub fn resolve_reply(
        &self,
        raw: &RawMessage,
        index: &HashMap<&str, &RawMessage>,
    ) -> Option<(String, ReplySource)> {
        let reply_key = raw.reply_key()?;

        if let Some(quoted) = raw.quoted_data.as_deref().filter(|q| !q.is_empty()) {
            return Some((quoted.to_string(), ReplySource::Quoted));
        }

        let resolved = match index.get(reply_key) {
            Some(target) => match target.caption.as_deref().filter(|c| !c.is_empty()) {
                Some(caption) => (caption.to_string(), ReplySource::Indexed),
                None => (
                    self.config.media_reply_placeholder.clone(),
                    ReplySource::MediaPlaceholder,
                ),
            },
            None => (
                self.config.missing_reply_placeholder.clone(),
                ReplySource::MissingPlaceholder,
            ),
        };
        Some(resolved)
    }
}

/// Normalizes a raw message mapping with the given configuration.
///
/// # Errors
///
/// Fails only if the configuration itself is invalid.
pub fn normalize(
    messages: &IndexMap<String, RawMessage>,
    config: &NormalizeConfig,
) -> Result<Vec<CanonicalMessage>, ChatnormError> {
    Ok(Normalizer::new(config)?.normalize(messages))
}

/// Normalizes a raw message mapping and returns a [`NormalizeReport`].
pub fn normalize_with_report(
    messages: &IndexMap<String, RawMessage>,
    config: &NormalizeConfig,
) -> Result<(Vec<CanonicalMessage>, NormalizeReport), ChatnormError> {
    Ok(Normalizer::new(config)?.normalize_with_report(messages))
}

/// Maps `key_id` to its record for every record that declares one.
///
/// A later record with the same `key_id` replaces an earlier one.
pub fn build_key_index(messages: &IndexMap<String, RawMessage>) -> HashMap<&str, &RawMessage> {
    messages
        .values()
        .filter_map(|msg| msg.key_id().map(|key| (key, msg)))
        .collect()
}

/// Returns the records sorted by raw timestamp, or `None` if some timestamp
/// cannot be compared. Records without a timestamp sort as zero.
fn chronological_order(messages: &IndexMap<String, RawMessage>) -> Option<Vec<&RawMessage>> {
    let mut keyed = messages
        .values()
        .map(|msg| match &msg.timestamp {
            Some(ts) => ts.sort_key().map(|key| (key, msg)),
            // A null or missing timestamp sorts first instead of disabling the sort.
            None => Some((0.0, msg)),
        })
        .collect::<Option<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Some(keyed.into_iter().map(|(_, msg)| msg).collect())
}

/// `data` when non-empty, otherwise `caption`.
fn consolidate_text(raw: &RawMessage) -> Option<String> {
    raw.data
        .as_deref()
        .filter(|d| !d.is_empty())
        .or(raw.caption.as_deref())
        .map(ToString::to_string)
}
