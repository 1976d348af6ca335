//! # chatnorm
//!
//! A Rust library for normalizing WhatsApp chat exports into a canonical
//! per-message record.
//!
//! ## Overview
//!
//! Two export shapes are supported:
//! - **Text transcripts** - one `DD/MM/YYYY, HH:MM - Author: text` line per
//!   message, read by the [line parser](parsing::transcript) and aggregated
//!   by [`TranscriptStats`](core::stats::TranscriptStats)
//! - **JSON exports** - a backup keyed by chat id, turned into a
//!   chronological sequence of [`CanonicalMessage`]s by the
//!   [normalizer](core::normalizer)
//!
//! The canonical sequence can then be written as JSON, JSONL or CSV, or split
//! into one file per calendar day.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatnorm::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let export = load_export("backup.json")?;
//!
//!     let config = NormalizeConfig::new()
//!         .with_author_me("Milind")
//!         .with_author_them("Ojou sama");
//!     let messages = normalize(&export.messages, &config)?;
//!
//!     write_json(&messages, "formatted_chat.json")?;
//!     write_daily_files(&split_by_day(&messages), "daily_chats")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] - Input readers
//!   - [`parsing::transcript`] - [`LineParser`](parsing::LineParser), [`LineKind`](parsing::LineKind)
//!   - [`parsing::export`] - [`load_export`](parsing::load_export), [`RawMessage`](parsing::RawMessage)
//!   - [`parsing::canonical`] - [`load_canonical`](parsing::load_canonical)
//! - [`core`] - Processing
//!   - [`core::normalizer`], [`core::timestamp`], [`core::filter`], [`core::split`],
//!     [`core::stats`], [`core::clean`], [`core::output`]
//! - [`config`] - [`NormalizeConfig`](config::NormalizeConfig), [`TranscriptConfig`](config::TranscriptConfig), [`CleanConfig`](config::CleanConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and dispatch helpers
//! - [`error`] - Unified error types ([`ChatnormError`], [`Result`])
//! - [`prelude`] - Convenient re-exports
//!
//! ## Logging
//!
//! Per-record problems (unconvertible timestamps, unreadable records, a
//! failed chronological sort) are reported through the [`log`] facade and
//! never abort a run. Install any `log` backend to see them.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use error::{ChatnormError, Result};
pub use message::{Author, CanonicalMessage};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatnorm::prelude::*;
/// ```
pub mod prelude {
    // Core message types
    pub use crate::message::{Author, CanonicalMessage};

    // Error types
    pub use crate::error::{ChatnormError, Result};

    // Configuration
    pub use crate::config::{CleanConfig, NormalizeConfig, TranscriptConfig};

    // Input
    pub use crate::parsing::{
        ChatExport, LineKind, LineParser, RawMessage, load_canonical, load_export, parse_line,
    };

    // Processing
    pub use crate::core::clean::{CleanReport, clean_transcript};
    pub use crate::core::filter::{DateRange, in_range};
    pub use crate::core::normalizer::{NormalizeReport, normalize, normalize_with_report};
    pub use crate::core::split::{day_key, split_by_day, write_daily_files};
    pub use crate::core::stats::{StatsTable, TranscriptStats};

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
