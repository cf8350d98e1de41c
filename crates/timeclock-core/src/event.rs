//! Logged events and the periods derived from them.

use std::fmt;

use chrono::{DateTime, Local, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `strftime` pattern for timestamps in the log file.
pub const TIME_FORMAT: &str = "%Y/%m/%d %I:%M%p";

/// The time-of-day part of [`TIME_FORMAT`].
pub const TIME_SHORT_FORMAT: &str = "%I:%M%p";

/// Validation errors for event fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value would break the one-event-per-line layout.
    #[error("{field} cannot contain a newline")]
    Newline { field: &'static str },

    /// `]` terminates the code block and cannot appear inside it.
    #[error("code cannot contain ']'")]
    CodeBracket,
}

/// A single logged instant.
///
/// An event marks the end of one period and the start of the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event happened, at minute precision.
    pub at: DateTime<Local>,
    /// Colon-delimited time code, possibly empty.
    pub code: String,
    /// Free-text note, possibly empty.
    pub desc: String,
}

impl Event {
    /// Creates an event from user input.
    ///
    /// `at` is truncated to the minute and both text fields are trimmed of
    /// spaces and tabs, matching what a reparse of the written log yields.
    pub fn new(
        at: DateTime<Local>,
        code: impl AsRef<str>,
        desc: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let code = trim_blank(code.as_ref());
        let desc = trim_blank(desc.as_ref());

        if code.contains('\n') {
            return Err(ValidationError::Newline { field: "code" });
        }
        if code.contains(']') {
            return Err(ValidationError::CodeBracket);
        }
        if desc.contains('\n') {
            return Err(ValidationError::Newline { field: "description" });
        }

        Ok(Self {
            at: truncate_to_minute(at),
            code: code.to_string(),
            desc: desc.to_string(),
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.at.format(TIME_FORMAT),
            self.code,
            self.desc
        )
    }
}

/// The span between two consecutive events.
///
/// By convention the code and description come from the event that opens
/// the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub begin: DateTime<Local>,
    pub end: DateTime<Local>,
    pub code: String,
    pub desc: String,
}

impl Period {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.begin
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {:5.1}h [{}] {}",
            self.begin.format(TIME_FORMAT),
            self.end.format(TIME_SHORT_FORMAT),
            hours(self.duration()),
            self.code,
            self.desc
        )
    }
}

/// Converts a duration to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn hours(duration: TimeDelta) -> f64 {
    duration.num_minutes() as f64 / 60.0
}

/// Trims spaces and tabs from both ends. Other whitespace is significant.
pub(crate) fn trim_blank(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(at: DateTime<Local>) -> DateTime<Local> {
    at - TimeDelta::seconds(i64::from(at.second()))
        - TimeDelta::nanoseconds(i64::from(at.nanosecond()))
}
