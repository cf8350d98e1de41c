//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::report::ReportArgs;

/// Plain-text time clock.
///
/// Records timestamped events in a text log. Each event starts a period
/// that runs until the next one; reports total those periods per code.
#[derive(Debug, Parser)]
#[command(name = "timeclock", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock a new event.
    Add(AddArgs),

    /// Change the time of the last event.
    Time {
        /// New time, e.g. "09:36AM" or "15 minutes ago".
        time: String,
    },

    /// Change the code of the last event.
    Code {
        /// New time code.
        code: String,
    },

    /// Change the note of the last event.
    #[command(alias = "desc")]
    Note {
        /// New note.
        #[arg(trailing_var_arg = true)]
        note: Vec<String>,
    },

    /// Show the last event.
    Status,

    /// List known time codes.
    #[command(alias = "info")]
    Codes,

    /// Summarize time per code and week.
    Report(ReportArgs),
}
