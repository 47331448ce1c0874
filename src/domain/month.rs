//! Target month selection.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KondateError, Result};

/// A calendar month to schedule.
///
/// Always holds a valid first-of-month date, so day iteration cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MonthKey", into = "MonthKey")]
pub struct TargetMonth {
    first: NaiveDate,
}

/// Serialized form: `{"year": 2025, "month": 3}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MonthKey {
    year: i32,
    month: u32,
}

impl TryFrom<MonthKey> for TargetMonth {
    type Error = KondateError;

    fn try_from(key: MonthKey) -> Result<Self> {
        Self::new(key.year, key.month)
    }
}

impl From<TargetMonth> for MonthKey {
    fn from(month: TargetMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
        }
    }
}

impl TargetMonth {
    /// Create a target month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| {
                KondateError::Configuration(format!("invalid month: {}-{:02}", year, month))
            })
    }

    /// The month after the one containing `date`.
    pub fn following(date: NaiveDate) -> Result<Self> {
        if date.month() == 12 {
            Self::new(date.year() + 1, 1)
        } else {
            Self::new(date.year(), date.month() + 1)
        }
    }

    pub fn next(&self) -> Result<Self> {
        Self::following(self.first)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Every date of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let month = self.first.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    pub fn days_in_month(&self) -> usize {
        self.days().count()
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}
