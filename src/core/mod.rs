//! Core processing logic for chatnorm.
//!
//! This module contains:
//! - [`filter`] - Inclusive date-range filtering
//! - [`timestamp`] - Epoch to ISO-8601 conversion
//! - [`normalizer`] - JSON export to canonical messages
//! - [`split`] - Day keys and per-day grouping
//! - [`stats`] - Message counts over text transcripts
//! - [`clean`] - Placeholder line removal
//! - [`output`] - Format writers (JSON, JSONL, CSV)
//!
//! # Quick Start
//!
//! ```rust
//! use chatnorm::core::{
//!     DateRange, TranscriptStats, day_key, normalize, split_by_day, write_json,
//! };
//! ```

pub mod clean;
pub mod filter;
pub mod normalizer;
pub mod output;
pub mod split;
pub mod stats;
pub mod timestamp;

// Re-export main types for convenience
pub use clean::{CleanReport, clean_str, clean_transcript};
pub use filter::{DateRange, in_range, parse_user_date};
pub use normalizer::{NormalizeReport, Normalizer, normalize, normalize_with_report};
pub use split::{UNKNOWN_DATE_KEY, day_key, split_by_day, write_daily_files};
pub use stats::{StatsTable, TranscriptStats};
pub use timestamp::to_iso_string;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
