//! Canonical sequence writers.
//!
//! - [`write_json`] / [`to_json`] - pretty JSON array, the canonical format
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON record per line
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter, requires `csv-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatnorm::Result<()> {
//! use chatnorm::core::output::{to_json, write_json, write_jsonl};
//! use chatnorm::CanonicalMessage;
//!
//! let messages = vec![
//!     CanonicalMessage::new("Me").with_text("Hello!"),
//!     CanonicalMessage::new("Them").with_text("Hi there!"),
//! ];
//!
//! write_json(&messages, "formatted_chat.json")?;
//! write_jsonl(&messages, "formatted_chat.jsonl")?;
//!
//! let json_string = to_json(&messages)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};
pub use jsonl_writer::{to_jsonl, write_jsonl};
