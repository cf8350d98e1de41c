//! Reading and writing the plain-text log format.
//!
//! One event per line:
//!
//! ```text
//! 2023/07/06 09:36AM [Project:Sub] Did a thing.
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. The code block is
//! optional and its padding is cosmetic.

use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use thiserror::Error;

use crate::cursor::Cursor;
use crate::event::{Event, TIME_FORMAT, trim_blank};
use crate::log::TimeLog;

const DIGITS: &str = "0123456789";
const DATE_SEPARATORS: &str = "/-.";
const BLANK: &str = " \t";

/// Errors raised while parsing a log. Each carries the 1-based line number.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A date or time did not have the `yyyy/mm/dd hh:mmPM` shape.
    #[error("malformed event date on line {line}")]
    BadDate { line: usize },

    /// Input ended while a token was still expected.
    #[error("unexpected end of input on line {line}")]
    UnexpectedEnd { line: usize },

    /// A code block was never closed on its line.
    #[error("malformed event on line {line}")]
    Malformed { line: usize },
}

impl ParseError {
    /// The line on which parsing stopped.
    pub const fn line(&self) -> usize {
        match self {
            Self::BadDate { line } | Self::UnexpectedEnd { line } | Self::Malformed { line } => {
                *line
            }
        }
    }
}

/// Parses a whole log. The first error aborts the parse.
///
/// Events are returned in file order.
pub fn parse_log(input: &str) -> Result<TimeLog, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut events = Vec::new();

    loop {
        cursor.eat(BLANK);
        match cursor.current() {
            None => break,
            Some('\n') => {
                cursor.advance();
                continue;
            }
            Some('#') => {
                cursor.eat_until("\n");
                cursor.advance();
                continue;
            }
            Some(_) => {}
        }

        events.push(parse_event(&mut cursor)?);
    }

    tracing::debug!(events = events.len(), "parsed time log");
    Ok(TimeLog::from(events))
}

fn parse_event(cursor: &mut Cursor<'_>) -> Result<Event, ParseError> {
    let at = parse_datetime(cursor)?;

    // The timestamp must be followed by blanks, or be alone on its line.
    if !cursor.matches(BLANK) && !cursor.matches("\n") {
        if cursor.at_end() {
            return Err(ParseError::UnexpectedEnd {
                line: cursor.line(),
            });
        }
        return Err(ParseError::BadDate {
            line: cursor.line(),
        });
    }
    cursor.eat(BLANK);

    let mut code = String::new();
    if cursor.matches("[") {
        cursor.advance();
        cursor.read_until("]\n", &mut code);
        match cursor.current() {
            None => {
                return Err(ParseError::UnexpectedEnd {
                    line: cursor.line(),
                });
            }
            Some('\n') => {
                return Err(ParseError::Malformed {
                    line: cursor.line(),
                });
            }
            Some(_) => cursor.advance(),
        }
        cursor.eat(BLANK);
    }

    let mut desc = String::new();
    cursor.read_until("\n", &mut desc);
    if cursor.at_end() {
        return Err(ParseError::UnexpectedEnd {
            line: cursor.line(),
        });
    }
    cursor.advance();

    Ok(Event {
        at,
        code: trim_blank(&code).to_string(),
        desc: trim_blank(&desc).to_string(),
    })
}

/// Reads exactly `width` digits as a number.
fn digits(cursor: &mut Cursor<'_>, width: usize) -> Result<u32, ParseError> {
    let line = cursor.line();
    if cursor.at_end() {
        return Err(ParseError::UnexpectedEnd { line });
    }

    let mut buf = String::with_capacity(width);
    cursor.read_match_limit(DIGITS, &mut buf, width);
    if buf.len() != width {
        if cursor.at_end() {
            return Err(ParseError::UnexpectedEnd { line });
        }
        return Err(ParseError::BadDate { line });
    }
    buf.parse().map_err(|_| ParseError::BadDate { line })
}

/// Consumes one character from `set`.
fn separator(cursor: &mut Cursor<'_>, set: &str) -> Result<char, ParseError> {
    match cursor.current() {
        None => Err(ParseError::UnexpectedEnd {
            line: cursor.line(),
        }),
        Some(c) if set.contains(c) => {
            cursor.advance();
            Ok(c)
        }
        Some(_) => Err(ParseError::BadDate {
            line: cursor.line(),
        }),
    }
}

fn parse_datetime(cursor: &mut Cursor<'_>) -> Result<DateTime<Local>, ParseError> {
    let line = cursor.line();
    let bad = ParseError::BadDate { line };

    let year = digits(cursor, 4)?;
    separator(cursor, DATE_SEPARATORS)?;
    let month = digits(cursor, 2)?;
    separator(cursor, DATE_SEPARATORS)?;
    let day = digits(cursor, 2)?;
    separator(cursor, " ")?;
    let hour = digits(cursor, 2)?;
    separator(cursor, ":")?;
    let minute = digits(cursor, 2)?;
    let pm = separator(cursor, "aApP")?.eq_ignore_ascii_case(&'p');
    separator(cursor, "mM")?;

    // 12-hour clock: 12AM is midnight, 12PM is noon.
    if hour > 12 {
        return Err(bad);
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (h, true) if h < 12 => h + 12,
        (h, _) => h,
    };

    let year = i32::try_from(year).map_err(|_| bad)?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(bad)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or(bad)?;

    // Ambiguous local times (DST fall-back) resolve to the earlier instant.
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or(bad)
}

/// Parses a single timestamp in the log's `yyyy/mm/dd hh:mmPM` pattern.
///
/// The whole string must be consumed.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Local>, ParseError> {
    let mut cursor = Cursor::new(input);
    let at = parse_datetime(&mut cursor)?;
    if !cursor.at_end() {
        return Err(ParseError::BadDate {
            line: cursor.line(),
        });
    }
    Ok(at)
}

/// Writes one line per event, padding codes to a common width.
pub fn format_log(events: &[Event]) -> String {
    let width = code_width(events);
    let mut out = String::new();
    for event in events {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{} [{:>width$}] {}",
            event.at.format(TIME_FORMAT),
            event.code,
            event.desc
        );
    }
    out
}

/// The display width of the widest code.
pub(crate) fn code_width(events: &[Event]) -> usize {
    events
        .iter()
        .map(|event| event.code.chars().count())
        .max()
        .unwrap_or(0)
}
