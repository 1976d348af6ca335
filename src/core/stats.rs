//! Message counts over a text transcript.
//!
//! [`TranscriptStats`] is filled in a single pass. Only lines the line parser
//! classifies as messages, and whose date falls inside the requested
//! [`DateRange`], are counted. System notices and continuation lines are
//! tallied separately so a run can show how much of the file was ignored.
//!
//! # Example
//!
//! ```rust
//! use chatnorm::config::TranscriptConfig;
//! use chatnorm::core::filter::DateRange;
//! use chatnorm::core::stats::TranscriptStats;
//!
//! let transcript = "\
//! 01/01/2024, 10:00 - Alice: Happy new year
//! 01/01/2024, 10:01 - Bob: Same to you
//! and to your family
//! 02/01/2024, 09:00 - Alice: Back to work";
//!
//! let stats = TranscriptStats::from_text(transcript, &TranscriptConfig::new(), &DateRange::unbounded());
//! assert_eq!(stats.total(), 3);
//! assert_eq!(stats.continuations(), 1);
//! assert_eq!(stats.per_author()[0].author, "Alice");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::TranscriptConfig;
use crate::core::filter::DateRange;
use crate::error::ChatnormError;
use crate::format::OutputFormat;
use crate::parsing::transcript::{LineKind, LineParser};

/// Messages sent on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// Calendar day taken from the line prefix
    pub date: NaiveDate,
    /// Message lines on that day
    pub messages: usize,
}

/// Messages sent by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    /// Sender name as written in the transcript
    pub author: String,
    /// Message lines by that sender
    pub messages: usize,
}

/// Messages sent by one author on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDayCount {
    /// Calendar day taken from the line prefix
    pub date: NaiveDate,
    /// Sender name as written in the transcript
    pub author: String,
    /// Message lines by that sender on that day
    pub messages: usize,
}

/// Which aggregate to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatsTable {
    /// One row per day
    #[default]
    Day,
    /// One row per author
    Author,
    /// One row per (day, author)
    AuthorDay,
}

impl StatsTable {
    /// Returns all tables in export order.
    pub fn all() -> &'static [StatsTable] {
        &[StatsTable::Day, StatsTable::Author, StatsTable::AuthorDay]
    }

    /// Short name used in file names and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StatsTable::Day => "day",
            StatsTable::Author => "author",
            StatsTable::AuthorDay => "author-day",
        }
    }
}

impl std::fmt::Display for StatsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StatsTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "date" => Ok(StatsTable::Day),
            "author" => Ok(StatsTable::Author),
            "author-day" | "author_day" => Ok(StatsTable::AuthorDay),
            _ => Err(format!(
                "Unknown table: '{}'. Expected one of: day, author, author-day",
                s
            )),
        }
    }
}

/// Counts collected from a transcript.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStats {
    per_day: BTreeMap<NaiveDate, usize>,
    per_author: HashMap<String, usize>,
    per_author_per_day: BTreeMap<(NaiveDate, String), usize>,
    total: usize,
    system_notices: usize,
    continuations: usize,
    out_of_range: usize,
}

impl TranscriptStats {
    /// Creates empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every line of `text`.
    pub fn from_text(text: &str, config: &TranscriptConfig, range: &DateRange) -> Self {
        let parser = LineParser::with_config(config.clone());
        let mut stats = Self::new();
        for line in text.lines() {
            stats.add_line(line, &parser, range);
        }
        stats
    }

    /// Counts every line read from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading fails or the input is not UTF-8.
    pub fn from_reader<R: BufRead>(
        reader: R,
        config: &TranscriptConfig,
        range: &DateRange,
    ) -> Result<Self, ChatnormError> {
        let parser = LineParser::with_config(config.clone());
        let mut stats = Self::new();
        for line in reader.lines() {
            stats.add_line(&line?, &parser, range);
        }
        debug!(
            "counted {} messages ({} notices, {} continuations, {} out of range)",
            stats.total, stats.system_notices, stats.continuations, stats.out_of_range
        );
        Ok(stats)
    }

    /// Counts the transcript stored at `path`.
    pub fn load(
        path: impl AsRef<Path>,
        config: &TranscriptConfig,
        range: &DateRange,
    ) -> Result<Self, ChatnormError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), config, range)
    }

    /// Classifies one line and updates the counts.
    pub fn add_line(&mut self, line: &str, parser: &LineParser, range: &DateRange) {
        // Exports often begin with a byte order mark.
        let line = line.trim_start_matches('\u{feff}');
        match parser.classify(line) {
            LineKind::Message { date, author } => {
                if !range.contains(date) {
                    self.out_of_range += 1;
                    return;
                }
                *self.per_day.entry(date).or_insert(0) += 1;
                *self.per_author.entry(author.to_string()).or_insert(0) += 1;
                *self
                    .per_author_per_day
                    .entry((date, author.to_string()))
                    .or_insert(0) += 1;
                self.total += 1;
            }
            LineKind::SystemNotice { .. } => self.system_notices += 1,
            LineKind::Continuation => self.continuations += 1,
        }
    }

    /// Counts per day, ascending by date.
    pub fn per_day(&self) -> Vec<DayCount> {
        self.per_day
            .iter()
            .map(|(&date, &messages)| DayCount { date, messages })
            .collect()
    }

    /// Counts per author, most active first. Ties are ordered by name.
    pub fn per_author(&self) -> Vec<AuthorCount> {
        let mut rows: Vec<_> = self
            .per_author
            .iter()
            .map(|(author, &messages)| AuthorCount {
                author: author.clone(),
                messages,
            })
            .collect();
        rows.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.author.cmp(&b.author)));
        rows
    }

    /// Counts per (day, author), ascending by date then author.
    pub fn per_author_per_day(&self) -> Vec<AuthorDayCount> {
        self.per_author_per_day
            .iter()
            .map(|((date, author), &messages)| AuthorDayCount {
                date: *date,
                author: author.clone(),
                messages,
            })
            .collect()
    }

    /// Distinct authors, sorted.
    pub fn authors(&self) -> Vec<&str> {
        let mut authors: Vec<_> = self.per_author.keys().map(String::as_str).collect();
        authors.sort_unstable();
        authors
    }

    /// Number of counted messages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of dated lines without an author.
    pub fn system_notices(&self) -> usize {
        self.system_notices
    }

    /// Number of lines without a date prefix.
    pub fn continuations(&self) -> usize {
        self.continuations
    }

    /// Number of message lines outside the date range.
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    /// Returns `true` if no message was counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Renders one table in the given format.
    pub fn table_to_string(
        &self,
        table: StatsTable,
        format: OutputFormat,
    ) -> Result<String, ChatnormError> {
        match table {
            StatsTable::Day => rows_to_string(&self.per_day(), format),
            StatsTable::Author => rows_to_string(&self.per_author(), format),
            StatsTable::AuthorDay => rows_to_string(&self.per_author_per_day(), format),
        }
    }

    /// Writes one table to `path` in the given format.
    pub fn write_table(
        &self,
        table: StatsTable,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<(), ChatnormError> {
        let path = path.as_ref();
        let content = self.table_to_string(table, format)?;
        std::fs::write(path, content).map_err(|e| ChatnormError::write(path, e))
    }
}

fn rows_to_string<T: Serialize>(rows: &[T], format: OutputFormat) -> Result<String, ChatnormError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            Ok(out)
        }
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b';')
                .from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8(bytes)?)
        }
        #[allow(unreachable_patterns)]
        _ => Err(OutputFormat::missing_feature(format)),
    }
}
