//! Core domain logic for the time clock.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing and writing the plain-text event log
//! - Deriving periods from events, with time-range views
//! - Hierarchical code filtering over a tree of colon-delimited codes
//! - Weekly aggregation of periods for reports

pub mod cursor;
mod event;
mod log;
mod parse;
pub mod report;
mod select;
pub mod tree;
pub mod week;

pub use event::{
    Event, Period, TIME_FORMAT, TIME_SHORT_FORMAT, ValidationError, hours, truncate_to_minute,
};
pub use log::{Selection, TimeLog};
pub use parse::{ParseError, format_log, parse_log, parse_timestamp};
pub use report::{Report, periods_in_range};
pub use select::{CodeFilter, SUBTREE_SUFFIX, select_periods};
pub use tree::{CodeTree, CodeTreeNode, NodePath};
pub use week::{DayTotals, WEEK_TOTAL, WeekBucket, aggregate_weeks};
