//! Inclusive date-range filtering.
//!
//! This module provides [`DateRange`] for defining an optional start and end
//! date, and [`in_range`] for the underlying predicate.
//!
//! # Bounds
//!
//! | Start | End | Matches |
//! |-------|-----|---------|
//! | `None` | `None` | every date |
//! | `Some(s)` | `None` | dates on or after `s` |
//! | `None` | `Some(e)` | dates on or before `e` |
//! | `Some(s)` | `Some(e)` | dates in `[s, e]` |
//!
//! # Examples
//!
//! ```
//! use chatnorm::config::TranscriptConfig;
//! use chatnorm::core::filter::DateRange;
//! use chrono::NaiveDate;
//!
//! # fn main() -> chatnorm::Result<()> {
//! let range = DateRange::from_user_input(
//!     Some("01/01/2024"),
//!     Some("31/01/2024"),
//!     &TranscriptConfig::new(),
//! )?;
//!
//! assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
//! assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::TranscriptConfig;
use crate::error::ChatnormError;

/// Returns `true` when `date` lies within the inclusive bounds.
///
/// An absent bound does not constrain that side.
pub fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

/// Optional inclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub start: Option<NaiveDate>,

    /// Last date included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting a start later than the end.
    ///
    /// # Errors
    ///
    /// Returns [`ChatnormError::InvalidRange`] if `start > end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ChatnormError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ChatnormError::InvalidRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// A range that matches every date.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parses bounds typed by a user in the transcript's date format.
    ///
    /// # Errors
    ///
    /// Returns [`ChatnormError::InvalidDate`] for an unparseable bound and
    /// [`ChatnormError::InvalidRange`] for reversed bounds.
    pub fn from_user_input(
        start: Option<&str>,
        end: Option<&str>,
        config: &TranscriptConfig,
    ) -> Result<Self, ChatnormError> {
        let start = start.map(|s| parse_user_date(s, config)).transpose()?;
        let end = end.map(|e| parse_user_date(e, config)).transpose()?;
        Self::new(start, end)
    }

    /// Returns `true` if `date` is within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        in_range(date, self.start, self.end)
    }

    /// Returns `true` if either bound is set.
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Parses a date entered by a user, e.g. `"15/01/2024"`.
///
/// # Errors
///
/// Returns [`ChatnormError::InvalidDate`] naming the expected format.
pub fn parse_user_date(input: &str, config: &TranscriptConfig) -> Result<NaiveDate, ChatnormError> {
    NaiveDate::parse_from_str(input.trim(), &config.date_format)
        .map_err(|_| ChatnormError::invalid_date(input, config.display_format()))
}
