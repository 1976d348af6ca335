//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level arguments and logging flags
//! - [`Command`] - the `normalize`, `split`, `stats` and `clean` subcommands
//! - [`OutputFormat`] and [`StatsBy`] - value enums for the flags
//!
//! The value enums convert into their library counterparts
//! ([`crate::format::OutputFormat`], [`crate::core::stats::StatsTable`]) so
//! the library itself never depends on clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{
    DEFAULT_AUTHOR_ME, DEFAULT_AUTHOR_THEM, DEFAULT_CLEAN_TOKEN, DEFAULT_DATE_FORMAT,
    DEFAULT_UTC_OFFSET,
};
use crate::core::stats::StatsTable;

/// Default file name for the normalized chat.
pub const DEFAULT_NORMALIZED_OUTPUT: &str = "formatted_chat.json";

/// Default directory for per-day files.
pub const DEFAULT_DAILY_DIR: &str = "daily_chats";

/// Normalize WhatsApp chat exports into canonical message records.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatnorm")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatnorm normalize backup.json
    chatnorm normalize backup.json --me Milind --them \"Ojou sama\" -f jsonl
    chatnorm split formatted_chat.json -o daily_chats
    chatnorm stats chat.txt --start 01/01/2024 --end 31/01/2024 --by author
    chatnorm clean chat.txt -o chat_clean.txt")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress details (same as RUST_LOG=info)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress warnings about skipped or degraded records
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    /// Log filter implied by `-v` / `-q`, overridable through `RUST_LOG`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "off"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert a JSON export into canonical messages
    #[command(visible_alias = "norm")]
    Normalize {
        /// Path to the JSON export
        input: PathBuf,

        /// Path to output file
        #[arg(short, long, default_value = DEFAULT_NORMALIZED_OUTPUT)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Display name for messages sent by the exporting account
        #[arg(long, value_name = "NAME", default_value = DEFAULT_AUTHOR_ME)]
        me: String,

        /// Display name for messages sent by the other participant
        #[arg(long, value_name = "NAME", default_value = DEFAULT_AUTHOR_THEM)]
        them: String,

        /// Timezone for rendered timestamps
        #[arg(long, value_name = "+HH:MM", default_value = DEFAULT_UTC_OFFSET, allow_hyphen_values = true)]
        utc_offset: String,
    },

    /// Split a normalized chat into one JSON file per day
    Split {
        /// Path to a normalized chat (JSON array)
        input: PathBuf,

        /// Directory for the per-day files
        #[arg(short, long, default_value = DEFAULT_DAILY_DIR)]
        output: PathBuf,
    },

    /// Count messages per day and per author in a text transcript
    Stats {
        /// Path to the text transcript
        input: PathBuf,

        /// First day to count (DD/MM/YYYY)
        #[arg(long, value_name = "DATE")]
        start: Option<String>,

        /// Last day to count (DD/MM/YYYY)
        #[arg(long, value_name = "DATE")]
        end: Option<String>,

        /// Which table to produce
        #[arg(long, value_enum, default_value = "all")]
        by: StatsBy,

        /// Output file; with `--by all` one file per table is written next to it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Date pattern at the start of each transcript line
        #[arg(long, value_name = "PATTERN", default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,
    },

    /// Remove lines containing a token from a text transcript
    Clean {
        /// Path to the text transcript
        input: PathBuf,

        /// Write here instead of modifying the input in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Lines containing this text (any case) are removed
        #[arg(short, long, default_value = DEFAULT_CLEAN_TOKEN)]
        token: String,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Pretty JSON array
    #[default]
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,

    /// CSV with semicolon delimiter
    Csv,
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}

/// Table selection for `stats --by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum StatsBy {
    /// Messages per day
    Day,
    /// Messages per author
    Author,
    /// Messages per author per day
    AuthorDay,
    /// All three tables
    #[default]
    All,
}

impl StatsBy {
    /// Library tables covered by this selection.
    pub fn tables(self) -> &'static [StatsTable] {
        match self {
            StatsBy::Day => &[StatsTable::Day],
            StatsBy::Author => &[StatsTable::Author],
            StatsBy::AuthorDay => &[StatsTable::AuthorDay],
            StatsBy::All => StatsTable::all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalize_defaults() {
        let args = Args::try_parse_from(["chatnorm", "normalize", "backup.json"]).unwrap();
        let Command::Normalize { output, format, me, them, utc_offset, .. } = args.command else {
            panic!("expected normalize");
        };
        assert_eq!(output, PathBuf::from("formatted_chat.json"));
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(me, "Me");
        assert_eq!(them, "Them");
        assert_eq!(utc_offset, "+05:30");
    }

    #[test]
    fn test_parse_negative_offset() {
        let args = Args::try_parse_from([
            "chatnorm", "normalize", "backup.json", "--utc-offset", "-03:00",
        ])
        .unwrap();
        let Command::Normalize { utc_offset, .. } = args.command else {
            panic!("expected normalize");
        };
        assert_eq!(utc_offset, "-03:00");
    }

    #[test]
    fn test_parse_stats() {
        let args = Args::try_parse_from([
            "chatnorm", "stats", "chat.txt", "--start", "01/01/2024", "--by", "author-day", "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.log_level(), "info");
        let Command::Stats { start, by, format, .. } = args.command else {
            panic!("expected stats");
        };
        assert_eq!(start.as_deref(), Some("01/01/2024"));
        assert_eq!(by, StatsBy::AuthorDay);
        assert_eq!(format, OutputFormat::Csv);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["chatnorm", "-v", "-q", "clean", "chat.txt"]).is_err());
    }

    #[test]
    fn test_log_level_default() {
        let args = Args::try_parse_from(["chatnorm", "split", "formatted_chat.json"]).unwrap();
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_stats_by_tables() {
        assert_eq!(StatsBy::All.tables().len(), 3);
        assert_eq!(StatsBy::Author.tables(), [StatsTable::Author]);
    }

    #[test]
    fn test_format_conversion() {
        let lib: crate::format::OutputFormat = OutputFormat::Jsonl.into();
        assert_eq!(lib, crate::format::OutputFormat::Jsonl);
    }
}
