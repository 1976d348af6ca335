//! WhatsApp JSON export loading.
//!
//! The export is a top-level object keyed by chat identifier. Exactly one chat
//! is expected; its value carries a `messages` object that maps an opaque
//! message id to a raw message record:
//!
//! ```json
//! {
//!   "916204411717@s.whatsapp.net": {
//!     "name": "Ojou",
//!     "messages": {
//!       "18442": {
//!         "from_me": true,
//!         "timestamp": 1700000000,
//!         "data": null,
//!         "caption": "hi",
//!         "media": true,
//!         "key_id": "3EB0A1F2"
//!       },
//!       "18443": {
//!         "from_me": false,
//!         "timestamp": 1700000100,
//!         "data": "ok",
//!         "reply": "3EB0A1F2",
//!         "quoted_data": null
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! The outer message id and `key_id` are different identities: replies point
//! at `key_id`, never at the outer id.
//!
//! Structural problems (non-object top level, missing or non-object
//! `messages`, invalid JSON) are errors. A field of an unexpected type is read
//! leniently; only a record that is not an object is logged and skipped.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ChatnormError;

const FORMAT: &str = "WhatsApp JSON export";

/// Raw epoch value as found in the export.
///
/// Exports normally carry integer seconds; floats and strings are tolerated so
/// that one odd record cannot fail the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Whole epoch seconds
    Integer(i64),
    /// Fractional epoch seconds
    Float(f64),
    /// A string where a number was expected
    Text(String),
}

impl RawTimestamp {
    /// Returns `false` for zero and empty values, which mark records that
    /// cannot be placed on the timeline.
    pub fn is_present(&self) -> bool {
        match self {
            RawTimestamp::Integer(v) => *v != 0,
            RawTimestamp::Float(v) => *v != 0.0,
            RawTimestamp::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric sort key, or `None` if the value cannot be compared.
    pub fn sort_key(&self) -> Option<f64> {
        match self {
            RawTimestamp::Integer(v) => Some(*v as f64),
            RawTimestamp::Float(v) if !v.is_nan() => Some(*v),
            RawTimestamp::Float(_) | RawTimestamp::Text(_) => None,
        }
    }
}

/// Raw message record from a JSON export.
///
/// Unknown fields are ignored. Field values of an unexpected type never fail
/// the record: flags are read by truthiness and other fields become absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Epoch seconds (UTC)
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<RawTimestamp>,
    /// Sent by the exporting account
    #[serde(default, deserialize_with = "lenient_flag")]
    pub from_me: Option<bool>,
    /// Message body
    #[serde(default, deserialize_with = "lenient_text")]
    pub data: Option<String>,
    /// Caption of a media message
    #[serde(default, deserialize_with = "lenient_text")]
    pub caption: Option<String>,
    /// Whether the message carries media
    #[serde(default, deserialize_with = "lenient_flag")]
    pub media: Option<bool>,
    /// `key_id` of the message being replied to
    #[serde(default, deserialize_with = "lenient_text")]
    pub reply: Option<String>,
    /// Inline copy of the replied-to content
    #[serde(default, deserialize_with = "lenient_text")]
    pub quoted_data: Option<String>,
    /// Identity that other messages' `reply` fields reference
    #[serde(default, deserialize_with = "lenient_text")]
    pub key_id: Option<String>,
}

/// Reads a flag the way the exporter's consumers do: `0`, `""`, `null`, `[]`
/// and `{}` are false, any other value is true.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    };
    Ok(Some(flag))
}

/// Keeps string values, treats anything else as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Numbers and strings are kept; booleans, arrays and objects become absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<RawTimestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp = match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_i64() {
            Some(v) => Some(RawTimestamp::Integer(v)),
            None => n.as_f64().map(RawTimestamp::Float),
        },
        Value::String(s) => Some(RawTimestamp::Text(s)),
        _ => None,
    };
    Ok(timestamp)
}

impl RawMessage {
    /// Returns `true` if the record was sent by the exporting account.
    pub fn is_from_me(&self) -> bool {
        self.from_me.unwrap_or(false)
    }

    /// Returns the media flag, defaulting to `false`.
    pub fn has_media(&self) -> bool {
        self.media.unwrap_or(false)
    }

    /// Returns `true` if the record has a usable timestamp.
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.as_ref().is_some_and(RawTimestamp::is_present)
    }

    /// Returns the non-empty `key_id`, if any.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref().filter(|k| !k.is_empty())
    }

    /// Returns the non-empty `reply` reference, if any.
    pub fn reply_key(&self) -> Option<&str> {
        self.reply.as_deref().filter(|k| !k.is_empty())
    }
}

/// A loaded export: the chat identifier and its messages in file order.
#[derive(Debug, Clone, Default)]
pub struct ChatExport {
    /// Top-level key of the chat
    pub chat_id: String,
    /// Messages keyed by their outer id, in file order
    pub messages: IndexMap<String, RawMessage>,
    /// Number of records that could not be read and were skipped
    pub skipped: usize,
}

impl ChatExport {
    /// Number of messages loaded.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no messages were loaded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Loads and validates an export file.
///
/// # Errors
///
/// - [`ChatnormError::Io`] if the file cannot be read
/// - [`ChatnormError::Parse`] if it is not valid JSON
/// - [`ChatnormError::InvalidFormat`] if the structure is wrong
pub fn load_export(path: impl AsRef<Path>) -> Result<ChatExport, ChatnormError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ChatnormError::export_parse(e, Some(path.to_path_buf())))?;
    export_from_value(value)
}

/// Parses and validates an export from a string.
///
/// # Example
///
/// ```rust
/// use chatnorm::parsing::export::parse_export_str;
///
/// let export = parse_export_str(r#"{"chat": {"messages": {"1": {"timestamp": 1700000000, "data": "hi"}}}}"#)?;
/// assert_eq!(export.chat_id, "chat");
/// assert_eq!(export.len(), 1);
/// # Ok::<(), chatnorm::ChatnormError>(())
/// ```
pub fn parse_export_str(content: &str) -> Result<ChatExport, ChatnormError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ChatnormError::export_parse(e, None))?;
    export_from_value(value)
}

/// Validates an already-parsed export document.
pub fn export_from_value(value: Value) -> Result<ChatExport, ChatnormError> {
    let Value::Object(chats) = value else {
        return Err(ChatnormError::invalid_format(
            FORMAT,
            format!("expected a JSON object at the top level, got {}", type_name(&value)),
        ));
    };

    let chat_count = chats.len();
    let Some((chat_id, chat)) = chats.into_iter().next() else {
        return Err(ChatnormError::invalid_format(FORMAT, "the export is an empty object"));
    };
    if chat_count > 1 {
        warn!("export contains {chat_count} chats, only '{chat_id}' is used");
    }

    let Value::Object(mut chat) = chat else {
        return Err(ChatnormError::invalid_format(
            FORMAT,
            format!("could not find 'messages' for chat {chat_id}"),
        ));
    };
    let Some(messages) = chat.remove("messages") else {
        return Err(ChatnormError::invalid_format(
            FORMAT,
            format!("could not find 'messages' for chat {chat_id}"),
        ));
    };
    let Value::Object(messages) = messages else {
        return Err(ChatnormError::invalid_format(
            FORMAT,
            format!(
                "'messages' must be an object keyed by message id, got {}",
                type_name(&messages)
            ),
        ));
    };

    let mut export = ChatExport {
        chat_id,
        messages: IndexMap::with_capacity(messages.len()),
        skipped: 0,
    };

    for (id, raw) in messages {
        match serde_json::from_value::<RawMessage>(raw) {
            Ok(msg) => {
                export.messages.insert(id, msg);
            }
            Err(e) => {
                warn!("skipping message {id}: {e}");
                export.skipped += 1;
            }
        }
    }

    debug!(
        "loaded {} messages for chat {} ({} skipped)",
        export.messages.len(),
        export.chat_id,
        export.skipped
    );
    Ok(export)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_export() {
        let export = parse_export_str(
            r#"{"123@s.whatsapp.net": {"name": "x", "messages": {
                "1": {"timestamp": 1700000000, "from_me": true, "caption": "hi", "key_id": "k1"},
                "2": {"timestamp": 1700000100, "from_me": false, "data": "ok", "reply": "k1"}
            }}}"#,
        )
        .unwrap();

        assert_eq!(export.chat_id, "123@s.whatsapp.net");
        assert_eq!(export.len(), 2);
        assert_eq!(export.skipped, 0);

        let first = &export.messages["1"];
        assert!(first.is_from_me());
        assert_eq!(first.key_id(), Some("k1"));
        assert_eq!(first.caption.as_deref(), Some("hi"));
        assert_eq!(export.messages["2"].reply_key(), Some("k1"));
    }

    #[test]
    fn test_mapping_order_is_preserved() {
        let export = parse_export_str(
            r#"{"c": {"messages": {"z": {"data": "1"}, "a": {"data": "2"}, "m": {"data": "3"}}}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = export.messages.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_nulls_are_absent() {
        let export = parse_export_str(
            r#"{"c": {"messages": {"1": {"timestamp": null, "from_me": null, "media": null, "data": null}}}}"#,
        )
        .unwrap();
        let msg = &export.messages["1"];
        assert!(!msg.has_timestamp());
        assert!(!msg.is_from_me());
        assert!(!msg.has_media());
        assert!(msg.data.is_none());
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let export = parse_export_str(
            r#"{"c": {"messages": {"1": {"data": "fine"}, "2": {"data": 42}, "3": "not an object"}}}"#,
        )
        .unwrap();
        assert_eq!(export.len(), 2);
        assert_eq!(export.skipped, 1);
        assert!(export.messages["2"].data.is_none());
    }

    #[test]
    fn test_mistyped_fields_keep_the_record() {
        let export = parse_export_str(
            r#"{"c": {"messages": {
                "1": {"key_id": "k1", "timestamp": 1700000000, "caption": "hi", "media": 1, "from_me": 0},
                "2": {"key_id": 7, "timestamp": true, "media": "", "from_me": "yes", "reply": ["k1"]}
            }}}"#,
        )
        .unwrap();
        assert_eq!(export.skipped, 0);

        let first = &export.messages["1"];
        assert!(first.has_media());
        assert!(!first.is_from_me());
        assert_eq!(first.key_id(), Some("k1"));
        assert_eq!(first.caption.as_deref(), Some("hi"));

        let second = &export.messages["2"];
        assert!(!second.has_media());
        assert!(second.is_from_me());
        assert!(second.key_id().is_none());
        assert!(second.reply_key().is_none());
        assert!(second.timestamp.is_none());
    }

    #[test]
    fn test_timestamp_variants() {
        let export = parse_export_str(
            r#"{"c": {"messages": {
                "1": {"timestamp": 1700000000},
                "2": {"timestamp": 1700000000.5},
                "3": {"timestamp": "1700000000"},
                "4": {"timestamp": 0}
            }}}"#,
        )
        .unwrap();
        assert_eq!(
            export.messages["1"].timestamp,
            Some(RawTimestamp::Integer(1700000000))
        );
        assert_eq!(
            export.messages["2"].timestamp,
            Some(RawTimestamp::Float(1700000000.5))
        );
        assert_eq!(
            export.messages["3"].timestamp,
            Some(RawTimestamp::Text("1700000000".into()))
        );
        assert!(!export.messages["4"].has_timestamp());
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(RawTimestamp::Integer(5).sort_key(), Some(5.0));
        assert_eq!(RawTimestamp::Float(5.5).sort_key(), Some(5.5));
        assert_eq!(RawTimestamp::Float(f64::NAN).sort_key(), None);
        assert_eq!(RawTimestamp::Text("5".into()).sort_key(), None);
    }

    #[test]
    fn test_empty_key_id_and_reply_are_absent() {
        let msg = RawMessage {
            key_id: Some(String::new()),
            reply: Some(String::new()),
            ..RawMessage::default()
        };
        assert_eq!(msg.key_id(), None);
        assert_eq!(msg.reply_key(), None);
    }

    #[test]
    fn test_top_level_not_object() {
        let err = parse_export_str("[1, 2, 3]").unwrap_err();
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_empty_object() {
        let err = parse_export_str("{}").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_missing_messages() {
        let err = parse_export_str(r#"{"c": {"name": "no messages here"}}"#).unwrap_err();
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("'messages'"));
    }

    #[test]
    fn test_chat_entry_not_object() {
        let err = parse_export_str(r#"{"c": 5}"#).unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_messages_not_object() {
        let err = parse_export_str(r#"{"c": {"messages": [1, 2]}}"#).unwrap_err();
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_export_str("{not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_only_first_chat_is_used() {
        let export = parse_export_str(
            r#"{"first": {"messages": {"1": {"data": "a"}}}, "second": {"messages": {}}}"#,
        )
        .unwrap();
        assert_eq!(export.chat_id, "first");
        assert_eq!(export.len(), 1);
    }

    #[test]
    fn test_load_export_missing_file() {
        let err = load_export("/definitely/not/here.json").unwrap_err();
        assert!(err.is_io());
    }
}
