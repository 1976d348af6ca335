//! Per-day grouping of canonical messages.
//!
//! Day keys are the lowercase `dd_mon` form of the calendar day in the
//! timestamp's own offset (`2023-11-22T21:05:00+05:30` is `22_nov`). Keys
//! carry no year, so the same date in different years shares a group.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use log::{debug, info};

use crate::error::ChatnormError;
use crate::message::CanonicalMessage;

/// Key used for messages whose timestamp is absent or unparseable.
pub const UNKNOWN_DATE_KEY: &str = "unknown_date";

const DAY_KEY_FORMAT: &str = "%d_%b";

/// Derives the grouping key for an ISO-8601 timestamp.
///
/// Never fails: unparseable input yields [`UNKNOWN_DATE_KEY`].
///
/// ```
/// use chatnorm::core::split::day_key;
///
/// assert_eq!(day_key("2023-11-22T21:05:00+05:30"), "22_nov");
/// assert_eq!(day_key("not a date"), "unknown_date");
/// ```
pub fn day_key(iso_timestamp: &str) -> String {
    parse_calendar_day(iso_timestamp.trim())
        .map(|day| day.format(DAY_KEY_FORMAT).to_string().to_lowercase())
        .unwrap_or_else(|| UNKNOWN_DATE_KEY.to_string())
}

/// Key for a message, using the sentinel when it has no timestamp.
pub fn message_day_key(message: &CanonicalMessage) -> String {
    message
        .timestamp
        .as_deref()
        .map_or_else(|| UNKNOWN_DATE_KEY.to_string(), day_key)
}

fn parse_calendar_day(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Groups messages by day key.
///
/// Groups appear in the order their key is first seen; each group keeps the
/// input order of its messages.
pub fn split_by_day(messages: &[CanonicalMessage]) -> IndexMap<String, Vec<CanonicalMessage>> {
    let mut groups: IndexMap<String, Vec<CanonicalMessage>> = IndexMap::new();
    for message in messages {
        groups
            .entry(message_day_key(message))
            .or_default()
            .push(message.clone());
    }
    debug!("split {} messages into {} days", messages.len(), groups.len());
    groups
}

/// Writes one `<key>.json` file per group into `dir`.
///
/// The directory is created if missing. Returns the written paths in group
/// order.
///
/// # Errors
///
/// Returns [`ChatnormError::Write`] naming the path that could not be
/// created or written.
pub fn write_daily_files(
    groups: &IndexMap<String, Vec<CanonicalMessage>>,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ChatnormError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| ChatnormError::write(dir, e))?;

    let mut written = Vec::with_capacity(groups.len());
    for (key, messages) in groups {
        let path = dir.join(format!("{key}.json"));
        let json = serde_json::to_string_pretty(messages)?;
        fs::write(&path, json).map_err(|e| ChatnormError::write(&path, e))?;
        info!("saved {} messages to {}", messages.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn at(ts: &str, text: &str) -> CanonicalMessage {
        CanonicalMessage::new("Me").with_timestamp(ts).with_text(text)
    }

    #[test]
    fn test_day_key() {
        assert_eq!(day_key("2023-11-22T21:05:00+05:30"), "22_nov");
        assert_eq!(day_key("2024-01-05T00:00:00+00:00"), "05_jan");
        assert_eq!(day_key("2023-11-15T03:43:20.500000+05:30"), "15_nov");
    }

    #[test]
    fn test_day_key_uses_local_calendar_day() {
        // 23:30 at -03:00 is already the next day in UTC; the key follows the offset.
        assert_eq!(day_key("2024-03-01T23:30:00-03:00"), "01_mar");
    }

    #[test]
    fn test_day_key_without_offset() {
        assert_eq!(day_key("2024-07-04T10:00:00"), "04_jul");
        assert_eq!(day_key("2024-07-04"), "04_jul");
    }

    #[test]
    fn test_day_key_unparseable() {
        assert_eq!(day_key(""), UNKNOWN_DATE_KEY);
        assert_eq!(day_key("yesterday"), UNKNOWN_DATE_KEY);
        assert_eq!(day_key("2024-13-40T00:00:00+00:00"), UNKNOWN_DATE_KEY);
    }

    #[test]
    fn test_split_preserves_order() {
        let messages = vec![
            at("2023-11-22T09:00:00+05:30", "a"),
            at("2023-11-23T09:00:00+05:30", "b"),
            at("2023-11-22T10:00:00+05:30", "c"),
            CanonicalMessage::new("Them").with_text("no time"),
        ];

        let groups = split_by_day(&messages);
        let keys: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["22_nov", "23_nov", UNKNOWN_DATE_KEY]);

        let nov22: Vec<_> = groups["22_nov"].iter().filter_map(|m| m.text.as_deref()).collect();
        assert_eq!(nov22, ["a", "c"]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, messages.len());
    }

    #[test]
    fn test_split_empty() {
        assert!(split_by_day(&[]).is_empty());
    }

    #[test]
    fn test_write_daily_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("daily_chats");
        let groups = split_by_day(&[
            at("2023-11-22T09:00:00+05:30", "namaste 🙏"),
            at("2023-11-23T09:00:00+05:30", "b"),
        ]);

        let paths = write_daily_files(&groups, &out).unwrap();
        assert_eq!(paths, [out.join("22_nov.json"), out.join("23_nov.json")]);

        let content = fs::read_to_string(&paths[0]).unwrap();
        assert!(content.contains("namaste 🙏"));
        let parsed: Vec<CanonicalMessage> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, groups["22_nov"]);
    }
}
