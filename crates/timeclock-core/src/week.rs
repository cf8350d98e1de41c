//! Weekly aggregation of periods.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, TimeDelta};

use crate::event::Period;

/// Index of the week total in [`DayTotals`].
pub const WEEK_TOTAL: usize = 7;

/// Monday through Sunday (indices 0..=6), then the week total.
pub type DayTotals = [TimeDelta; 8];

/// The periods of one ISO week and their totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// ISO week-numbering year.
    pub year: i32,
    /// ISO week number, 1 to 53.
    pub week: u32,
    pub periods: Vec<Period>,
    /// Per-code totals.
    pub totals: BTreeMap<String, DayTotals>,
    /// Totals across all codes.
    pub daily: DayTotals,
}

impl WeekBucket {
    fn new(year: i32, week: u32) -> Self {
        Self {
            year,
            week,
            periods: Vec::new(),
            totals: BTreeMap::new(),
            daily: [TimeDelta::zero(); 8],
        }
    }

    fn add(&mut self, period: Period) {
        let day = weekday_index(period.begin);
        let length = period.duration();

        let code = self
            .totals
            .entry(period.code.clone())
            .or_insert([TimeDelta::zero(); 8]);
        code[day] += length;
        code[WEEK_TOTAL] += length;
        self.daily[day] += length;
        self.daily[WEEK_TOTAL] += length;

        self.periods.push(period);
    }

    pub const fn total(&self) -> TimeDelta {
        self.daily[WEEK_TOTAL]
    }
}

/// Monday = 0 through Sunday = 6.
pub fn weekday_index(at: DateTime<Local>) -> usize {
    at.weekday().num_days_from_monday() as usize
}

/// Groups periods into ISO weeks by their start time.
///
/// A period counts in full toward the day and week it begins in. Buckets
/// come back in chronological order. Input that is not sorted by start time
/// is sorted first, so a week is never split into two buckets.
pub fn aggregate_weeks(mut periods: Vec<Period>) -> Vec<WeekBucket> {
    if !periods.is_sorted_by_key(|period| period.begin) {
        tracing::debug!("periods out of order, sorting before aggregation");
        periods.sort_by_key(|period| period.begin);
    }

    let mut weeks = Vec::new();
    let mut open: Option<WeekBucket> = None;
    for period in periods {
        let iso = period.begin.iso_week();
        let (year, week) = (iso.year(), iso.week());

        let mut bucket = match open.take() {
            Some(bucket) if bucket.year == year && bucket.week == week => bucket,
            Some(closed) => {
                weeks.push(closed);
                WeekBucket::new(year, week)
            }
            None => WeekBucket::new(year, week),
        };
        bucket.add(period);
        open = Some(bucket);
    }
    weeks.extend(open);

    tracing::debug!(weeks = weeks.len(), "aggregated periods into weeks");
    weeks
}
