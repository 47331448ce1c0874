//! One scheduled calendar day.

use chrono::NaiveDate;
use serde::Serialize;

use super::item::Item;

/// Output of the scheduler for one date. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub category: String,
    pub item: Item,
}

impl ScheduledDay {
    pub fn item_name(&self) -> &str {
        &self.item.name
    }
}
