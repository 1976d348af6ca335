//! Input parsing for both export flavours.
//!
//! - [`transcript`] - line-by-line classification of text transcripts
//! - [`export`] - loading and structural validation of JSON exports
//! - [`canonical`] - reading normalized message files back

pub mod canonical;
pub mod export;
pub mod transcript;

pub use canonical::{load_canonical, parse_canonical_str};
pub use export::{ChatExport, RawMessage, RawTimestamp, load_export, parse_export_str};
pub use transcript::{LineKind, LineParser, classify_line, parse_line};
