//! Line parser for WhatsApp text transcripts.
//!
//! A user message in an exported transcript looks like
//!
//! ```text
//! 01/01/2024, 10:00 - John: Hello
//! ```
//!
//! Every line is classified on its own, without any cross-line state:
//!
//! - [`LineKind::Message`] - date prefix, `" - "` separator and an author
//!   terminated by a colon
//! - [`LineKind::SystemNotice`] - date prefix and separator, but no author
//!   colon (`"01/01/2024, 10:00 - Alice left"`)
//! - [`LineKind::Continuation`] - anything without a parseable date prefix
//!   or without the separator, i.e. the wrapped tail of a multi-line body
//!
//! Continuation lines are not attributed to the preceding message. Callers
//! that count messages therefore count only the first physical line of a
//! multi-line body, which is the intended approximation.

use chrono::NaiveDate;

use crate::config::TranscriptConfig;

/// Separator between the timestamp and the author.
pub const AUTHOR_SEPARATOR: &str = " - ";

/// Classification of a single transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A genuine user message.
    Message {
        /// Calendar date of the message
        date: NaiveDate,
        /// Author name, trimmed
        author: &'a str,
    },
    /// A dated notice without an author (joins, leaves, encryption banner).
    SystemNotice {
        /// Calendar date of the notice
        date: NaiveDate,
    },
    /// A line with no date/author prefix of its own.
    Continuation,
}

impl<'a> LineKind<'a> {
    /// Returns the `(date, author)` pair for message lines.
    pub fn as_message(&self) -> Option<(NaiveDate, &'a str)> {
        match *self {
            LineKind::Message { date, author } => Some((date, author)),
            _ => None,
        }
    }

    /// Returns `true` for [`LineKind::Message`].
    pub fn is_message(&self) -> bool {
        matches!(self, LineKind::Message { .. })
    }
}

/// Classifies one raw transcript line.
///
/// `date_format` is a chrono pattern applied to the text before the first
/// comma. Never fails: malformed input is a [`LineKind::Continuation`].
///
/// # Example
///
/// ```rust
/// use chatnorm::parsing::transcript::{LineKind, classify_line};
///
/// let kind = classify_line("01/01/2024, 10:00 - Alice left", "%d/%m/%Y");
/// assert!(matches!(kind, LineKind::SystemNotice { .. }));
///
/// let kind = classify_line("and this is the second line of a message", "%d/%m/%Y");
/// assert_eq!(kind, LineKind::Continuation);
/// ```
pub fn classify_line<'a>(line: &'a str, date_format: &str) -> LineKind<'a> {
    let date_part = line.split(',').next().unwrap_or_default();
    let Ok(date) = NaiveDate::parse_from_str(date_part, date_format) else {
        return LineKind::Continuation;
    };

    let Some(separator) = line.find(AUTHOR_SEPARATOR) else {
        return LineKind::Continuation;
    };

    let author_start = separator + AUTHOR_SEPARATOR.len();
    let Some(colon) = line[author_start..].find(':') else {
        return LineKind::SystemNotice { date };
    };

    let author = line[author_start..author_start + colon].trim();
    if author.is_empty() {
        return LineKind::SystemNotice { date };
    }

    LineKind::Message { date, author }
}

/// Extracts `(date, author)` from a message line, or `None` otherwise.
///
/// This is the two-way view of [`classify_line`]: system notices and
/// continuation lines both come back as `None`.
///
/// # Example
///
/// ```rust
/// use chatnorm::parsing::transcript::parse_line;
/// use chrono::NaiveDate;
///
/// let parsed = parse_line("01/01/2024, 10:00 - John: Hello", "%d/%m/%Y");
/// assert_eq!(parsed, Some((NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "John")));
/// ```
pub fn parse_line<'a>(line: &'a str, date_format: &str) -> Option<(NaiveDate, &'a str)> {
    classify_line(line, date_format).as_message()
}

/// Line parser bound to a [`TranscriptConfig`].
///
/// # Example
///
/// ```rust
/// use chatnorm::parsing::transcript::LineParser;
///
/// let parser = LineParser::new();
/// assert!(parser.parse("01/01/2024, 10:00 - John: Hello").is_some());
/// assert!(parser.parse("01/01/2024, 10:00 - John joined").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    config: TranscriptConfig,
}

impl LineParser {
    /// Creates a parser with the default `dd/mm/yyyy` date pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: TranscriptConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &TranscriptConfig {
        &self.config
    }

    /// See [`classify_line`].
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        classify_line(line, &self.config.date_format)
    }

    /// See [`parse_line`].
    pub fn parse<'a>(&self, line: &'a str) -> Option<(NaiveDate, &'a str)> {
        parse_line(line, &self.config.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FMT: &str = "%d/%m/%Y";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_simple_message() {
        let kind = classify_line("01/01/2024, 10:00 - John: Hello", FMT);
        assert_eq!(
            kind,
            LineKind::Message {
                date: date(2024, 1, 1),
                author: "John"
            }
        );
    }

    #[test]
    fn test_author_is_trimmed() {
        let parsed = parse_line("15/03/2023, 09:15 -   Mary Ann  : hi there", FMT);
        assert_eq!(parsed, Some((date(2023, 3, 15), "Mary Ann")));
    }

    #[test]
    fn test_colon_in_message_body() {
        let parsed = parse_line("22/11/2024, 23:59 - Bob: note: buy milk", FMT);
        assert_eq!(parsed, Some((date(2024, 11, 22), "Bob")));
    }

    #[test]
    fn test_unicode_author() {
        let parsed = parse_line("22/11/2024, 23:59 - 𝐎𝐣𝐨𝐮-𝐒𝐚𝐦𝐚✨: おはよう", FMT);
        assert_eq!(parsed, Some((date(2024, 11, 22), "𝐎𝐣𝐨𝐮-𝐒𝐚𝐦𝐚✨")));
    }

    #[test]
    fn test_phone_number_author() {
        let parsed = parse_line("02/02/2024, 08:00 - +91 98765 43210: hey", FMT);
        assert_eq!(parsed, Some((date(2024, 2, 2), "+91 98765 43210")));
    }

    #[test]
    fn test_system_notice() {
        assert_eq!(
            classify_line("01/01/2024, 10:00 - Alice left", FMT),
            LineKind::SystemNotice {
                date: date(2024, 1, 1)
            }
        );
        assert_eq!(
            classify_line(
                "01/01/2024, 10:00 - Messages and calls are end-to-end encrypted",
                FMT
            ),
            LineKind::SystemNotice {
                date: date(2024, 1, 1)
            }
        );
    }

    #[test]
    fn test_empty_author_is_not_a_message() {
        let kind = classify_line("01/01/2024, 10:00 - : nobody", FMT);
        assert!(matches!(kind, LineKind::SystemNotice { .. }));
    }

    #[test]
    fn test_continuation_without_date() {
        assert_eq!(
            classify_line("second line of a long message", FMT),
            LineKind::Continuation
        );
        assert_eq!(
            classify_line("- Bob: not a real prefix", FMT),
            LineKind::Continuation
        );
    }

    #[test]
    fn test_continuation_with_date_but_no_separator() {
        // A wrapped body line that happens to start with a date.
        assert_eq!(
            classify_line("01/01/2024, we should meet", FMT),
            LineKind::Continuation
        );
    }

    #[test]
    fn test_malformed_lines() {
        for line in ["", " ", ",", " - ", "01/01/2024", "31/02/2024, 10:00 - A: b"] {
            assert!(parse_line(line, FMT).is_none(), "line {line:?}");
        }
    }

    #[test]
    fn test_date_must_be_entire_prefix() {
        assert!(parse_line("01/01/2024 10:00 - John: Hello", FMT).is_none());
        assert!(parse_line("[01/01/2024, 10:00] John: Hello", FMT).is_none());
    }

    #[test]
    fn test_custom_date_format() {
        let parser = LineParser::with_config(TranscriptConfig::new().with_date_format("%m/%d/%y"));
        let parsed = parser.parse("1/15/24, 10:30 AM - Alice: Hi");
        assert_eq!(parsed, Some((date(2024, 1, 15), "Alice")));
    }

    #[test]
    fn test_line_kind_helpers() {
        let kind = classify_line("01/01/2024, 10:00 - John: Hello", FMT);
        assert!(kind.is_message());
        assert!(!LineKind::Continuation.is_message());
        assert_eq!(LineKind::Continuation.as_message(), None);
    }
}
