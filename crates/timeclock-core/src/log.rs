//! The in-memory time log and the periods derived from it.
//!
//! The log owns its events. Range filters return [`Selection`]s: index views
//! into the log, so an edit made through [`TimeLog::get_mut`] with a selected
//! index is an edit of the log itself. [`TimeLog::periods`] and
//! [`Selection::periods`] instead produce owned [`Period`] values that share
//! nothing with the events they came from.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Local};

use crate::event::{Event, Period};
use crate::parse;

/// An ordered sequence of events, in file order until sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeLog {
    events: Vec<Event>,
}

impl TimeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Mutable access by index, typically an index taken from a [`Selection`].
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.events.get_mut(index)
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Event> {
        self.events.last_mut()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Stable sort by timestamp. Events sharing a timestamp keep their order.
    pub fn sort(&mut self) {
        self.events.sort_by_key(|event| event.at);
    }

    /// The events strictly after `t`.
    pub fn after(&self, t: DateTime<Local>) -> Selection<'_> {
        self.select(|at| at > t)
    }

    /// The events strictly between `t1` and `t2`, in either order.
    pub fn between(&self, t1: DateTime<Local>, t2: DateTime<Local>) -> Selection<'_> {
        let (lo, hi) = if t1 > t2 { (t2, t1) } else { (t1, t2) };
        self.select(|at| at > lo && at < hi)
    }

    /// Every event, as a selection.
    pub fn all(&self) -> Selection<'_> {
        self.select(|_| true)
    }

    fn select(&self, keep: impl Fn(DateTime<Local>) -> bool) -> Selection<'_> {
        let indices = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| keep(event.at))
            .map(|(index, _)| index)
            .collect();
        Selection { log: self, indices }
    }

    /// Sorts the log, then folds each adjacent pair of events into a period.
    pub fn periods(&mut self) -> Vec<Period> {
        self.sort();
        fold_periods(self.events.iter())
    }

    /// Distinct non-blank codes used in the log, sorted.
    pub fn codes(&self) -> Vec<String> {
        self.events
            .iter()
            .filter(|event| !event.code.trim().is_empty())
            .map(|event| event.code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Width of the widest code, used to align the code column.
    pub fn code_width(&self) -> usize {
        parse::code_width(&self.events)
    }
}

impl From<Vec<Event>> for TimeLog {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for TimeLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// Serializes the log in its on-disk format.
impl fmt::Display for TimeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&parse::format_log(&self.events))
    }
}

/// A subsequence of a [`TimeLog`], held as indices into the log.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    log: &'a TimeLog,
    indices: Vec<usize>,
}

impl<'a> Selection<'a> {
    /// Indices into the source log, usable with [`TimeLog::get_mut`].
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        let log = self.log;
        self.indices.iter().map(move |&index| &log.events[index])
    }

    /// Stable sort of the view by timestamp. The log itself is untouched.
    pub fn sort(&mut self) {
        let log = self.log;
        self.indices.sort_by_key(|&index| log.events[index].at);
    }

    /// Sorts the view, then folds adjacent selected events into periods.
    pub fn periods(&mut self) -> Vec<Period> {
        self.sort();
        fold_periods(self.iter())
    }
}

fn fold_periods<'e>(events: impl Iterator<Item = &'e Event>) -> Vec<Period> {
    let mut out = Vec::new();
    let mut last: Option<&Event> = None;
    for event in events {
        if let Some(open) = last {
            out.push(Period {
                begin: open.at,
                end: event.at,
                code: open.code.clone(),
                desc: open.desc.clone(),
            });
        }
        last = Some(event);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};

    fn local(d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 7, d, h, mi, 0).unwrap()
    }

    fn event(at: DateTime<Local>, code: &str, desc: &str) -> Event {
        Event {
            at,
            code: code.to_string(),
            desc: desc.to_string(),
        }
    }

    #[test]
    fn test_code_width_counts_characters() {
        let log = TimeLog::from(vec![
            event(local(6, 9, 0), "", "uncoded"),
            event(local(6, 10, 0), "Ünï:ß", "multi-byte"),
            event(local(6, 11, 0), "ABCD", ""),
        ]);
        assert_eq!(log.code_width(), 5);

        let blank = TimeLog::from(vec![event(local(6, 9, 0), "", "")]);
        assert_eq!(blank.code_width(), 0);
        assert_eq!(TimeLog::new().code_width(), 0);
    }

    fn unsorted() -> TimeLog {
        TimeLog::from(vec![
            event(local(6, 12, 0), "B", "second"),
            event(local(6, 9, 0), "A", "first"),
            event(local(6, 17, 0), "", "done"),
            event(local(6, 12, 0), "C", "second, tied"),
        ])
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let mut log = unsorted();
        log.sort();
        let codes: Vec<_> = log.events().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["A", "B", "C", ""]);

        let once = log.clone();
        log.sort();
        assert_eq!(log, once);
    }

    #[test]
    fn test_sort_is_a_permutation() {
        let original = unsorted();
        let mut sorted = original.clone();
        sorted.sort();
        assert_eq!(sorted.len(), original.len());
        for event in original.events() {
            assert!(sorted.events().contains(event));
        }
    }

    #[test]
    fn test_periods_pair_adjacent_events() {
        let mut log = unsorted();
        let periods = log.periods();
        assert_eq!(periods.len(), log.len() - 1);

        for (i, period) in periods.iter().enumerate() {
            assert_eq!(period.begin, log.events()[i].at);
            assert_eq!(period.end, log.events()[i + 1].at);
            assert_eq!(period.code, log.events()[i].code);
            assert_eq!(period.desc, log.events()[i].desc);
        }
        assert_eq!(periods[0].duration(), TimeDelta::hours(3));
    }

    #[test]
    fn test_periods_sort_the_log_in_place() {
        let mut log = unsorted();
        let _ = log.periods();
        assert_eq!(log.events()[0].code, "A");
    }

    #[test]
    fn test_zero_or_one_event_yields_no_periods() {
        assert!(TimeLog::new().periods().is_empty());
        let mut single = TimeLog::from(vec![event(local(6, 9, 0), "A", "")]);
        assert!(single.periods().is_empty());
    }

    #[test]
    fn test_periods_are_independent_of_events() {
        let mut log = unsorted();
        let periods = log.periods();
        log.get_mut(0).unwrap().code = "changed".to_string();
        assert_eq!(periods[0].code, "A");
    }

    #[test]
    fn test_after_is_strict() {
        let log = unsorted();
        let selected = log.after(local(6, 12, 0));
        let codes: Vec<_> = selected.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, [""]);
    }

    #[test]
    fn test_between_is_symmetric_and_exclusive() {
        let log = unsorted();
        let forward = log.between(local(6, 9, 0), local(6, 17, 0));
        let backward = log.between(local(6, 17, 0), local(6, 9, 0));
        assert_eq!(forward.indices(), backward.indices());

        let codes: Vec<_> = forward.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["B", "C"]);
    }

    #[test]
    fn test_selection_indices_edit_the_source_log() {
        let mut log = unsorted();
        let index = log.after(local(6, 12, 0)).indices()[0];
        log.get_mut(index).unwrap().desc = "edited".to_string();
        assert_eq!(log.events()[2].desc, "edited");
    }

    #[test]
    fn test_selection_periods_sort_the_view_only() {
        let log = unsorted();
        let mut selection = log.after(local(6, 8, 0));
        let periods = selection.periods();

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].code, "A");
        assert_eq!(selection.indices(), [1, 0, 3, 2]);
        assert_eq!(log.events()[0].code, "B");
    }

    #[test]
    fn test_codes_are_distinct_and_skip_blanks() {
        let mut log = unsorted();
        log.push(event(local(7, 9, 0), "A", "again"));
        log.push(event(local(7, 10, 0), "  ", "blank"));
        assert_eq!(log.codes(), ["A", "B", "C"]);
    }

    #[test]
    fn test_display_writes_the_log_format() {
        let log = TimeLog::from(vec![
            event(local(6, 9, 36), "Project:Sub", "Did a thing."),
            event(local(6, 17, 36), "A", ""),
        ]);
        assert_eq!(
            log.to_string(),
            "2023/07/06 09:36AM [Project:Sub] Did a thing.\n\
             2023/07/06 05:36PM [          A] \n"
        );
    }
}
