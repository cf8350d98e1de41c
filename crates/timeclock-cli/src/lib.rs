//! Time clock CLI library.
//!
//! Wires the `timeclock-core` log model to a log file, a code file and
//! the `timeclock` command line.

mod cli;
pub mod codes;
pub mod commands;
mod config;
pub mod store;

pub use cli::{Cli, Commands};
pub use config::Config;
