//! Optional selection constraints layered on the recency check.
//!
//! A constraint can only forbid candidates. When everything in a pool is
//! forbidden the index falls back to a forced repeat, so constraints are soft.

use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::domain::{Item, ScheduledDay};

/// Extra rule consulted for every candidate during selection.
pub trait SelectionConstraint: fmt::Debug + Send + Sync {
    /// `history` holds the days already scheduled in the current run, in order.
    fn forbids(&self, candidate: &Item, date: NaiveDate, history: &[ScheduledDay]) -> bool;
}

/// Caps how many days per ISO week may use items carrying a tag.
///
/// Only days scheduled in the current run are counted, so a week that
/// straddles a month boundary starts its count at the first of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyTagLimit {
    tag: String,
    max_per_week: usize,
}

impl WeeklyTagLimit {
    pub fn new(tag: impl Into<String>, max_per_week: usize) -> Self {
        Self {
            tag: tag.into(),
            max_per_week,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn used_this_week(&self, date: NaiveDate, history: &[ScheduledDay]) -> usize {
        let week = date.iso_week();
        history
            .iter()
            .rev()
            .take_while(|d| d.date.iso_week() == week)
            .filter(|d| d.item.has_tag(&self.tag))
            .count()
    }
}

impl SelectionConstraint for WeeklyTagLimit {
    fn forbids(&self, candidate: &Item, date: NaiveDate, history: &[ScheduledDay]) -> bool {
        candidate.has_tag(&self.tag) && self.used_this_week(date, history) >= self.max_per_week
    }
}
