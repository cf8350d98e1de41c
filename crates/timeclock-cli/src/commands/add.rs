//! Add command: clock a new event.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::Args;
use timeclock_core::{Event, TIME_FORMAT, hours};

use crate::Config;
use crate::codes::{append_code, load_codes};
use crate::commands::util::parse_time;
use crate::store::LogFile;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// When the event happened.
    #[arg(short, long, default_value = "now")]
    pub at: String,

    /// Time code for the period this event starts.
    #[arg(long)]
    pub code: Option<String>,

    /// Print the event without writing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Note for the period this event starts.
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &AddArgs,
    config: &Config,
    now: DateTime<Local>,
) -> Result<()> {
    let at = parse_time(&args.at, now, config.round_minutes)?;
    let code = args.code.as_deref().unwrap_or_default();
    let event = Event::new(at, code, args.note.join(" ")).context("invalid event")?;

    let mut log_file = LogFile::open(&config.log_file)?;
    if let Some(last) = log_file.log.last() {
        if event.at < last.at {
            bail!(
                "given time ({}) is before previous event time ({})",
                event.at.format(TIME_FORMAT),
                last.at.format(TIME_FORMAT)
            );
        }
        writeln!(writer, "{last}")?;
        writeln!(writer, " == {:.1}h ==>", hours(event.at - last.at))?;
    }
    writeln!(writer, "{event}")?;

    if event.code.is_empty() {
        tracing::warn!("no time code given, use 'code' to set one");
    }
    if event.desc.is_empty() {
        tracing::warn!("no note given, use 'note' to set one");
    }

    if args.dry_run {
        return Ok(());
    }

    let new_code = !event.code.is_empty()
        && !load_codes(&config.code_file)?.contains(&event.code);
    let code = event.code.clone();

    log_file.log.push(event);
    log_file.save()?;

    // Record the code only once the event is saved.
    if new_code {
        append_code(&config.code_file, &code)?;
    }
    Ok(())
}
