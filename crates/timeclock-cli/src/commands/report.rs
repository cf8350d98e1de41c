//! Report command for summarizing time spent per code.
//!
//! `timeclock report --from <TIME> [--to <TIME>] [CODE...]` selects the
//! periods in range, keeps those matching the code arguments and prints
//! them grouped by ISO week with per-day totals.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Args;
use serde::Serialize;
use timeclock_core::{
    CodeFilter, CodeTree, DayTotals, Report, TIME_FORMAT, WEEK_TOTAL, WeekBucket, hours,
    periods_in_range, select_periods,
};

use crate::Config;
use crate::codes::{known_codes, load_codes};
use crate::commands::util::parse_time;
use crate::store::LogFile;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Start of the report range (exclusive).
    #[arg(long)]
    pub from: String,

    /// End of the report range (exclusive). Open-ended when omitted.
    #[arg(long)]
    pub to: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Codes to include: a code, `CODE:...` for a code and everything
    /// below it, `all` for any coded period, `empty` for uncoded ones.
    pub codes: Vec<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    now: DateTime<Local>,
) -> Result<()> {
    let begin = parse_time(&args.from, now, config.round_minutes)?;
    let end = args
        .to
        .as_deref()
        .map(|to| parse_time(to, now, config.round_minutes))
        .transpose()?;

    let log_file = LogFile::open(&config.log_file)?;
    let file_codes = load_codes(&config.code_file)?;
    let tree = CodeTree::from_codes(known_codes(&file_codes, &log_file.log));
    let filters: Vec<CodeFilter> = args
        .codes
        .iter()
        .map(|code| CodeFilter::from(code.as_str()))
        .collect();

    let periods = select_periods(periods_in_range(&log_file.log, begin, end), &filters, &tree);
    tracing::debug!(periods = periods.len(), "selected periods for report");

    if periods.is_empty() {
        writeln!(writer, "No periods in given time range.")?;
        return Ok(());
    }

    let report = Report::build(begin, end, periods);
    if args.json {
        writeln!(writer, "{}", format_report_json(&report)?)?;
    } else {
        write_report(writer, &report)?;
    }
    Ok(())
}

// ========== Text Output ==========

/// Label used for periods without a code.
fn code_label(code: &str) -> &str {
    if code.is_empty() { "-" } else { code }
}

fn write_totals_row<W: Write>(
    writer: &mut W,
    label: &str,
    width: usize,
    totals: &DayTotals,
) -> Result<()> {
    write!(writer, "{label:<width$}")?;
    for total in totals {
        write!(writer, "{:>7.1}", hours(*total))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_week<W: Write>(writer: &mut W, bucket: &WeekBucket, width: usize) -> Result<()> {
    writeln!(writer, "Week {}, {}", bucket.week, bucket.year)?;
    for period in &bucket.periods {
        writeln!(writer, "{}", period.to_string().trim_end())?;
    }
    writeln!(writer)?;

    write!(writer, "{:<width$}", "Code")?;
    for day in DAY_NAMES {
        write!(writer, "{day:>7}")?;
    }
    writeln!(writer, "{:>7}", "Total")?;
    for (code, totals) in &bucket.totals {
        write_totals_row(writer, code_label(code), width, totals)?;
    }
    write_totals_row(writer, "Daily", width, &bucket.daily)?;
    Ok(())
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    match report.end {
        Some(end) => writeln!(
            writer,
            "Periods between: {} and {}",
            report.begin.format(TIME_FORMAT),
            end.format(TIME_FORMAT)
        )?,
        None => writeln!(writer, "Periods after: {}", report.begin.format(TIME_FORMAT))?,
    }

    let width = report
        .totals
        .keys()
        .map(|code| code_label(code).chars().count())
        .chain(["Daily".len(), "Total".len()])
        .max()
        .unwrap_or_default();

    for bucket in &report.weeks {
        writeln!(writer)?;
        write_week(writer, bucket, width)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Totals")?;
    for (code, total) in &report.totals {
        writeln!(writer, "{:<width$}{:>7.1}h", code_label(code), hours(*total))?;
    }
    writeln!(writer, "{:<width$}{:>7.1}h", "Total", hours(report.total()))?;
    Ok(())
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub timezone: String,
    pub begin: String,
    pub end: Option<String>,
    pub total_minutes: i64,
    pub totals: BTreeMap<String, i64>,
    pub weeks: Vec<JsonWeek>,
}

#[derive(Debug, Serialize)]
pub struct JsonWeek {
    pub year: i32,
    pub week: u32,
    pub total_minutes: i64,
    /// Minutes per code, Monday first, then the week total.
    pub days: BTreeMap<String, [i64; WEEK_TOTAL + 1]>,
    /// Minutes across all codes, laid out like `days`.
    pub daily: [i64; WEEK_TOTAL + 1],
    pub periods: Vec<JsonPeriod>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub begin: String,
    pub end: String,
    pub minutes: i64,
    pub code: String,
    pub desc: String,
}

fn day_minutes(totals: &DayTotals) -> [i64; WEEK_TOTAL + 1] {
    std::array::from_fn(|day| totals[day].num_minutes())
}

/// Formats the report as JSON.
pub fn format_report_json(report: &Report) -> Result<String> {
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "local".to_string());

    let weeks = report
        .weeks
        .iter()
        .map(|bucket| JsonWeek {
            year: bucket.year,
            week: bucket.week,
            total_minutes: bucket.total().num_minutes(),
            days: bucket
                .totals
                .iter()
                .map(|(code, totals)| (code.clone(), day_minutes(totals)))
                .collect(),
            daily: day_minutes(&bucket.daily),
            periods: bucket
                .periods
                .iter()
                .map(|period| JsonPeriod {
                    begin: period.begin.to_rfc3339(),
                    end: period.end.to_rfc3339(),
                    minutes: period.duration().num_minutes(),
                    code: period.code.clone(),
                    desc: period.desc.clone(),
                })
                .collect(),
        })
        .collect();

    let json = JsonReport {
        timezone,
        begin: report.begin.to_rfc3339(),
        end: report.end.map(|end| end.to_rfc3339()),
        total_minutes: report.total().num_minutes(),
        totals: report
            .totals
            .iter()
            .map(|(code, total)| (code.clone(), total.num_minutes()))
            .collect(),
        weeks,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use chrono::TimeZone;
    use insta::assert_snapshot;

    const LOG: &str = "\
2023/07/05 04:00PM [Old] before the range
2023/07/06 09:00AM [A] morning
2023/07/06 12:00PM [B] afternoon
2023/07/06 01:30PM [] break
2023/07/06 02:00PM [A:X] more
2023/07/06 05:00PM [] home
";

    fn setup() -> (tempfile::TempDir, Config) {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: temp.path().join("timeclock.log"),
            code_file: temp.path().join("codes.txt"),
            round_minutes: 6,
        };
        fs::write(&config.log_file, LOG).unwrap();
        (temp, config)
    }

    fn args(from: &str, to: Option<&str>, json: bool, codes: &[&str]) -> ReportArgs {
        ReportArgs {
            from: from.to_string(),
            to: to.map(ToString::to_string),
            json,
            codes: codes.iter().map(ToString::to_string).collect(),
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 7, 7, 12, 0, 0).unwrap()
    }

    fn report(args: &ReportArgs, config: &Config) -> String {
        let mut output = Vec::new();
        run(&mut output, args, config, now()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_text_report_for_all_codes() {
        let (_temp, config) = setup();
        let output = report(&args("2023/07/06 08:00AM", None, false, &[]), &config);

        assert_snapshot!(output, @r"
        Periods after: 2023/07/06 08:00AM

        Week 27, 2023
        2023/07/06 09:00AM - 12:00PM   3.0h [A] morning
        2023/07/06 12:00PM - 01:30PM   1.5h [B] afternoon
        2023/07/06 02:00PM - 05:00PM   3.0h [A:X] more

        Code     Mon    Tue    Wed    Thu    Fri    Sat    Sun  Total
        A        0.0    0.0    0.0    3.0    0.0    0.0    0.0    3.0
        A:X      0.0    0.0    0.0    3.0    0.0    0.0    0.0    3.0
        B        0.0    0.0    0.0    1.5    0.0    0.0    0.0    1.5
        Daily    0.0    0.0    0.0    7.5    0.0    0.0    0.0    7.5

        Totals
        A        3.0h
        A:X      3.0h
        B        1.5h
        Total    7.5h
        ");
    }

    #[test]
    fn test_subtree_and_empty_filters() {
        let (_temp, config) = setup();
        let output = report(
            &args("2023/07/06 08:00AM", None, false, &["A:...", "empty"]),
            &config,
        );

        assert!(output.contains("[A] morning"));
        assert!(output.contains("[A:X] more"));
        assert!(output.contains("[] break"));
        assert!(!output.contains("[B]"));
        assert!(output.contains("Total    6.5h"));
    }

    #[test]
    fn test_between_excludes_boundary_events() {
        let (_temp, config) = setup();
        let output = report(
            &args("2023/07/06 09:00AM", Some("2023/07/06 02:00PM"), false, &[]),
            &config,
        );

        assert!(output.starts_with("Periods between: 2023/07/06 09:00AM and 2023/07/06 02:00PM\n"));
        assert!(output.contains("[B] afternoon"));
        assert!(!output.contains("[A] morning"));
    }

    #[test]
    fn test_empty_range_is_reported() {
        let (_temp, config) = setup();
        let output = report(&args("2023/07/07 08:00AM", None, false, &[]), &config);
        assert_eq!(output, "No periods in given time range.\n");
    }

    #[test]
    fn test_unknown_code_selects_nothing() {
        let (_temp, config) = setup();
        let output = report(&args("2023/07/06 08:00AM", None, false, &["Nope:..."]), &config);
        assert_eq!(output, "No periods in given time range.\n");
    }

    #[test]
    fn test_json_report_has_minutes_per_code_and_day() {
        let (_temp, config) = setup();
        let output = report(&args("2023/07/06 08:00AM", None, true, &[]), &config);

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["total_minutes"], 450);
        assert_eq!(json["totals"]["A:X"], 180);
        assert!(json["end"].is_null());
        assert_eq!(json["weeks"][0]["week"], 27);
        assert_eq!(json["weeks"][0]["days"]["B"][3], 90);
        assert_eq!(json["weeks"][0]["days"]["B"][WEEK_TOTAL], 90);
        assert_eq!(json["weeks"][0]["daily"][3], 450);
        assert_eq!(json["weeks"][0]["daily"][WEEK_TOTAL], 450);
        assert_eq!(json["weeks"][0]["periods"].as_array().unwrap().len(), 3);
        assert_eq!(json["weeks"][0]["periods"][1]["desc"], "afternoon");
    }
}
