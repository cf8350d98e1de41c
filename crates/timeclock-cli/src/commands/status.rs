//! Status command for showing the current last event.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use timeclock_core::hours;

use crate::Config;
use crate::store::LogFile;

pub fn run<W: Write>(writer: &mut W, config: &Config, now: DateTime<Local>) -> Result<()> {
    let log_file = LogFile::open(&config.log_file)?;
    let Some(last) = log_file.log.last() else {
        bail!("no events found in {}", log_file.path().display());
    };

    writeln!(writer, "{last}")?;
    if now > last.at {
        writeln!(writer, " == {:.1}h so far", hours(now - last.at))?;
    }
    Ok(())
}
