//! Turning report code arguments into a period selection.

use std::fmt;

use crate::event::Period;
use crate::tree::{CodeTree, filter_in, filter_out};

/// Suffix that widens a code to its whole subtree.
pub const SUBTREE_SUFFIX: &str = ":...";

/// One code argument of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFilter {
    /// Periods with a blank code.
    Empty,
    /// Periods with any non-blank code.
    All,
    /// Periods with exactly this code.
    Exact(String),
    /// Periods with this code or any code below it.
    Subtree(String),
}

impl From<&str> for CodeFilter {
    fn from(token: &str) -> Self {
        match token {
            "empty" => Self::Empty,
            "all" => Self::All,
            _ => token.strip_suffix(SUBTREE_SUFFIX).map_or_else(
                || Self::Exact(token.to_string()),
                |code| Self::Subtree(code.to_string()),
            ),
        }
    }
}

impl fmt::Display for CodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::All => f.write_str("all"),
            Self::Exact(code) => f.write_str(code),
            Self::Subtree(code) => write!(f, "{code}{SUBTREE_SUFFIX}"),
        }
    }
}

/// Applies `filters` in order and returns the union of their matches,
/// sorted by start time.
///
/// Each filter takes its matches out of the remaining pool, so a period
/// matched by several filters is selected once. No filters means
/// [`CodeFilter::All`].
pub fn select_periods(all: Vec<Period>, filters: &[CodeFilter], tree: &CodeTree) -> Vec<Period> {
    let default = [CodeFilter::All];
    let filters = if filters.is_empty() { &default[..] } else { filters };

    let mut pool = all;
    let mut selected = Vec::new();
    for filter in filters {
        let (taken, rest) = match filter {
            CodeFilter::Empty => (filter_in(&pool, ""), filter_out(&pool, "")),
            CodeFilter::All => (filter_out(&pool, ""), filter_in(&pool, "")),
            CodeFilter::Exact(code) => (filter_in(&pool, code), filter_out(&pool, code)),
            CodeFilter::Subtree(code) if tree.contains(code) => (
                tree.filter_in_subtree(&pool, code),
                tree.filter_out_subtree(&pool, code),
            ),
            CodeFilter::Subtree(code) => {
                tracing::warn!(code = %code, "unknown code, nothing selected for it");
                (Vec::new(), pool)
            }
        };
        tracing::debug!(%filter, selected = taken.len(), "applied code filter");
        selected.extend(taken);
        pool = rest;
    }

    selected.sort_by_key(|period| period.begin);
    selected
}
