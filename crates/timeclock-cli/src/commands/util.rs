//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, DurationRound, Local, TimeDelta};
use regex::Regex;
use timeclock_core::{parse_timestamp, truncate_to_minute};

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("valid relative time regex")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a time argument.
///
/// Supports:
/// - "now"
/// - The log's own format: "2023/07/06 09:36AM" (`-` and `.` also separate dates)
/// - A time today: "09:36AM"
/// - RFC 3339: "2023-07-06T09:36:00-04:00"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
///
/// "now" and relative times are rounded to `round_minutes`; explicit times
/// are kept as given, minus any seconds.
pub fn parse_time(
    s: &str,
    now: DateTime<Local>,
    round_minutes: u32,
) -> anyhow::Result<DateTime<Local>> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("now") {
        return round_time(now, round_minutes);
    }

    if let Ok(at) = parse_timestamp(s) {
        return Ok(at);
    }

    let today = format!("{} {s}", now.format("%Y/%m/%d"));
    if let Ok(at) = parse_timestamp(&today) {
        return Ok(at);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(truncate_to_minute(dt.with_timezone(&Local)));
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use 'now', 2023/07/06 09:36AM, 09:36AM, RFC 3339, or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = TimeDelta::minutes(n * minutes_per_unit);
    round_time(now - duration, round_minutes)
}

/// Rounds to the nearest multiple of `minutes` on the local clock.
pub fn round_time(at: DateTime<Local>, minutes: u32) -> anyhow::Result<DateTime<Local>> {
    let at = truncate_to_minute(at);
    if minutes <= 1 {
        return Ok(at);
    }
    at.duration_round(TimeDelta::minutes(i64::from(minutes)))
        .with_context(|| format!("failed to round {at} to {minutes} minutes"))
}
