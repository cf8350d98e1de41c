//! Report data assembled from a time log.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeDelta};

use crate::event::Period;
use crate::log::TimeLog;
use crate::week::{WeekBucket, aggregate_weeks};

/// Everything a report renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub begin: DateTime<Local>,
    /// `None` for an open-ended "everything after `begin`" report.
    pub end: Option<DateTime<Local>>,
    pub periods: Vec<Period>,
    /// Running total per code over the whole range.
    pub totals: BTreeMap<String, TimeDelta>,
    pub weeks: Vec<WeekBucket>,
}

impl Report {
    pub fn build(
        begin: DateTime<Local>,
        end: Option<DateTime<Local>>,
        mut periods: Vec<Period>,
    ) -> Self {
        periods.sort_by_key(|period| period.begin);
        let totals = code_totals(&periods);
        let weeks = aggregate_weeks(periods.clone());
        Self {
            begin,
            end,
            periods,
            totals,
            weeks,
        }
    }

    pub fn total(&self) -> TimeDelta {
        self.totals.values().copied().sum()
    }
}

/// The periods formed by the events after `begin`, or strictly between
/// `begin` and `end`.
pub fn periods_in_range(
    log: &TimeLog,
    begin: DateTime<Local>,
    end: Option<DateTime<Local>>,
) -> Vec<Period> {
    let mut selection = match end {
        Some(end) => log.between(begin, end),
        None => log.after(begin),
    };
    selection.periods()
}

/// Sums period durations per code.
pub fn code_totals(periods: &[Period]) -> BTreeMap<String, TimeDelta> {
    let mut totals = BTreeMap::new();
    for period in periods {
        *totals.entry(period.code.clone()).or_insert_with(TimeDelta::zero) += period.duration();
    }
    totals
}
