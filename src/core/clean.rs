//! Removal of placeholder lines from text transcripts.
//!
//! Exports taken "without media" replace every attachment with a line such as
//! `01/01/2024, 10:00 - Alice: <Media omitted>`. [`clean_transcript`] drops
//! every line containing the configured token, ignoring case.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use regex::{Regex, RegexBuilder};
use tempfile::NamedTempFile;

use crate::config::CleanConfig;
use crate::error::ChatnormError;

/// Outcome of a cleaning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Lines written to the output
    pub kept: usize,
    /// Lines that contained the token
    pub removed: usize,
}

/// Case-insensitive literal matcher for the configured token.
#[derive(Debug, Clone)]
pub struct LineCleaner {
    pattern: Regex,
}

impl LineCleaner {
    /// Builds a matcher for `config.token`.
    pub fn new(config: &CleanConfig) -> Result<Self, ChatnormError> {
        let pattern = RegexBuilder::new(&regex::escape(&config.token))
            .case_insensitive(true)
            .build()
            .map_err(|e| ChatnormError::invalid_format("clean token", e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Returns `true` if `line` should be removed.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Filters `text`, keeping line terminators of retained lines.
    pub fn clean(&self, text: &str) -> (String, CleanReport) {
        let mut out = String::with_capacity(text.len());
        let mut report = CleanReport::default();
        for line in text.split_inclusive('\n') {
            if self.matches(line) {
                report.removed += 1;
            } else {
                out.push_str(line);
                report.kept += 1;
            }
        }
        (out, report)
    }
}

/// Removes matching lines from an in-memory transcript.
pub fn clean_str(text: &str, config: &CleanConfig) -> Result<(String, CleanReport), ChatnormError> {
    Ok(LineCleaner::new(config)?.clean(text))
}

/// Removes matching lines from the transcript at `input`.
///
/// With `output`, the result is written there and `input` is left untouched.
/// Without it, `input` is replaced through a temporary file in the same
/// directory, so a failed run never leaves a half-written transcript.
///
/// # Errors
///
/// Returns an I/O error if `input` cannot be read, or
/// [`ChatnormError::Write`] if the result cannot be stored.
pub fn clean_transcript(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &CleanConfig,
) -> Result<CleanReport, ChatnormError> {
    let input = input.as_ref();
    let text = fs::read_to_string(input)?;
    let (cleaned, report) = clean_str(&text, config)?;

    match output {
        Some(path) => fs::write(path, cleaned).map_err(|e| ChatnormError::write(path, e))?,
        None => replace_in_place(input, &cleaned)?,
    }

    info!(
        "removed {} lines containing {:?} ({} kept)",
        report.removed, config.token, report.kept
    );
    Ok(report)
}

fn replace_in_place(path: &Path, content: &str) -> Result<(), ChatnormError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ChatnormError::write(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| ChatnormError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| ChatnormError::write(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
01/01/2024, 10:00 - Alice: hello
01/01/2024, 10:01 - Bob: <Media omitted>
01/01/2024, 10:02 - Alice: <MEDIA OMITTED>
01/01/2024, 10:03 - Bob: bye
";

    #[test]
    fn test_clean_str_case_insensitive() {
        let (out, report) = clean_str(SAMPLE, &CleanConfig::new()).unwrap();
        assert_eq!(report, CleanReport { kept: 2, removed: 2 });
        assert_eq!(
            out,
            "01/01/2024, 10:00 - Alice: hello\n01/01/2024, 10:03 - Bob: bye\n"
        );
    }

    #[test]
    fn test_token_is_literal() {
        let config = CleanConfig::new().with_token("a.c");
        let (out, report) = clean_str("abc\na.c\n", &config).unwrap();
        assert_eq!(out, "abc\n");
        assert_eq!(report.removed, 1);
    }

    #[test]
    fn test_last_line_without_newline() {
        let (out, _) = clean_str("keep\n<Media omitted>", &CleanConfig::new()).unwrap();
        assert_eq!(out, "keep\n");
    }

    #[test]
    fn test_clean_to_output_leaves_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        let output = dir.path().join("clean.txt");
        fs::write(&input, SAMPLE).unwrap();

        let report = clean_transcript(&input, Some(&output), &CleanConfig::new()).unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(fs::read_to_string(&input).unwrap(), SAMPLE);
        assert!(!fs::read_to_string(&output).unwrap().contains("omitted"));
    }

    #[test]
    fn test_clean_in_place() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("chat.txt");
        fs::write(&input, SAMPLE).unwrap();

        clean_transcript(&input, None, &CleanConfig::new()).unwrap();
        let content = fs::read_to_string(&input).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_clean_missing_input() {
        let dir = tempdir().unwrap();
        let err = clean_transcript(dir.path().join("nope.txt"), None, &CleanConfig::new()).unwrap_err();
        assert!(err.is_io());
    }
}
