//! CLI subcommand implementations.

pub mod add;
pub mod codes;
pub mod edit;
pub mod report;
pub mod status;
pub mod util;
