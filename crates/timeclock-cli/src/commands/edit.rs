//! Commands that amend the last event: `time`, `code` and `note`.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use timeclock_core::{Event, TIME_FORMAT};

use crate::Config;
use crate::codes::{append_code, load_codes};
use crate::commands::util::parse_time;
use crate::store::LogFile;

/// Opens the log and applies `edit` to its last event, then saves.
fn edit_last(config: &Config, edit: impl FnOnce(&mut Event) -> Result<()>) -> Result<Event> {
    let mut log_file = LogFile::open(&config.log_file)?;
    let last = log_file
        .log
        .last_mut()
        .ok_or_else(|| anyhow!("no events found in {}", config.log_file.display()))?;
    edit(last)?;
    let edited = last.clone();
    log_file.save()?;
    Ok(edited)
}

pub fn set_time<W: Write>(
    writer: &mut W,
    time: &str,
    config: &Config,
    now: DateTime<Local>,
) -> Result<()> {
    let at = parse_time(time, now, config.round_minutes)?;
    let edited = edit_last(config, |last| {
        last.at = at;
        Ok(())
    })?;
    writeln!(
        writer,
        "Changed last event time to: {}",
        edited.at.format(TIME_FORMAT)
    )?;
    Ok(())
}

pub fn set_code<W: Write>(writer: &mut W, code: &str, config: &Config) -> Result<()> {
    let edited = edit_last(config, |last| {
        *last = Event::new(last.at, code, &last.desc).context("invalid code")?;
        Ok(())
    })?;

    if !edited.code.is_empty() && !load_codes(&config.code_file)?.contains(&edited.code) {
        append_code(&config.code_file, &edited.code)?;
    }

    writeln!(writer, "Changed last event time code to: {}", edited.code)?;
    Ok(())
}

pub fn set_note<W: Write>(writer: &mut W, note: &[String], config: &Config) -> Result<()> {
    let edited = edit_last(config, |last| {
        *last = Event::new(last.at, &last.code, note.join(" ")).context("invalid note")?;
        Ok(())
    })?;
    writeln!(writer, "Changed last event description to: {}", edited.desc)?;
    Ok(())
}
