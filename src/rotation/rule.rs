//! Weekday → category table.

use chrono::Weekday;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{KondateError, Result};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Maps each weekday to the category scheduled on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCategoryRule {
    /// Indexed by days from Monday (0 = Mon, 6 = Sun)
    categories: [String; 7],
}

impl DayCategoryRule {
    /// Build a rule from weekday/category pairs.
    ///
    /// Every weekday must appear exactly once.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Weekday, S)>,
        S: Into<String>,
    {
        let mut slots: [Option<String>; 7] = Default::default();
        for (weekday, category) in entries {
            let category = category.into();
            if category.trim().is_empty() {
                return Err(KondateError::Configuration(format!("empty category for {}", weekday)));
            }
            let slot = &mut slots[weekday.num_days_from_monday() as usize];
            if slot.is_some() {
                return Err(KondateError::Configuration(format!(
                    "{} listed more than once",
                    weekday
                )));
            }
            *slot = Some(category);
        }

        let missing: Vec<String> = WEEKDAYS
            .iter()
            .filter(|d| slots[d.num_days_from_monday() as usize].is_none())
            .map(|d| d.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(KondateError::Configuration(format!(
                "weekday table does not cover: {}",
                missing.join(", ")
            )));
        }

        let categories = slots.map(|s| s.unwrap_or_default());
        Ok(Self { categories })
    }

    /// Build a rule from a config table.
    ///
    /// Keys are weekday names (`mon`, `Monday`, ...) or indices `0` (Mon) to `6` (Sun).
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self> {
        let entries = table
            .iter()
            .map(|(key, category)| Ok((parse_weekday(key)?, category.clone())))
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn category_for(&self, weekday: Weekday) -> &str {
        &self.categories[weekday.num_days_from_monday() as usize]
    }

    /// Category for a weekday index, 0 (Mon) through 6 (Sun).
    pub fn category_for_index(&self, index: usize) -> Result<&str> {
        self.categories
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| out_of_range(index))
    }

    /// Distinct categories referenced by the table, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.categories.iter().map(String::as_str).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

fn parse_weekday(key: &str) -> Result<Weekday> {
    let key = key.trim();
    if let Ok(index) = key.parse::<usize>() {
        return WEEKDAYS
            .get(index)
            .copied()
            .ok_or_else(|| out_of_range(index));
    }
    Weekday::from_str(key)
        .map_err(|_| KondateError::Configuration(format!("unknown weekday: '{}'", key)))
}

fn out_of_range(index: usize) -> KondateError {
    KondateError::Configuration(format!("weekday index out of range: {}", index))
}
