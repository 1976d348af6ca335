//! Epoch-to-ISO-8601 conversion in a fixed target timezone.
//!
//! The input is always interpreted as UTC. The output carries the target
//! offset explicitly, e.g. `2023-11-15T03:43:20+05:30`. Values with a
//! fractional part are rendered with microseconds.
//!
//! Conversion never fails loudly: an out-of-range or non-numeric value is
//! logged and yields `None`, which callers treat as "timestamp unavailable".

use chrono::{DateTime, FixedOffset};
use log::warn;

use crate::parsing::export::RawTimestamp;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const ISO_FORMAT_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Converts whole epoch seconds to an ISO-8601 string in `offset`.
///
/// # Example
///
/// ```rust
/// use chatnorm::core::timestamp::to_iso_string;
/// use chrono::FixedOffset;
///
/// let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
/// assert_eq!(
///     to_iso_string(1700000000, &ist).as_deref(),
///     Some("2023-11-15T03:43:20+05:30")
/// );
/// ```
pub fn to_iso_string(epoch_seconds: i64, offset: &FixedOffset) -> Option<String> {
    let Some(utc) = DateTime::from_timestamp(epoch_seconds, 0) else {
        warn!("error converting timestamp {epoch_seconds}: out of range");
        return None;
    };
    Some(utc.with_timezone(offset).format(ISO_FORMAT).to_string())
}

/// Converts fractional epoch seconds to an ISO-8601 string in `offset`.
pub fn to_iso_string_f64(epoch_seconds: f64, offset: &FixedOffset) -> Option<String> {
    if !epoch_seconds.is_finite() {
        warn!("error converting timestamp {epoch_seconds}: not a finite number");
        return None;
    }

    let micros = (epoch_seconds * 1e6).round() as i64;
    if micros % 1_000_000 == 0 {
        return to_iso_string(micros / 1_000_000, offset);
    }

    let Some(utc) = DateTime::from_timestamp_micros(micros) else {
        warn!("error converting timestamp {epoch_seconds}: out of range");
        return None;
    };
    Some(utc.with_timezone(offset).format(ISO_FORMAT_MICROS).to_string())
}

/// Converts any raw export timestamp.
///
/// String values are not coerced; they yield `None` with a warning.
pub fn raw_to_iso_string(raw: &RawTimestamp, offset: &FixedOffset) -> Option<String> {
    match raw {
        RawTimestamp::Integer(secs) => to_iso_string(*secs, offset),
        RawTimestamp::Float(secs) => to_iso_string_f64(*secs, offset),
        RawTimestamp::Text(text) => {
            warn!("error converting timestamp {text:?}: expected a number");
            None
        }
    }
}
