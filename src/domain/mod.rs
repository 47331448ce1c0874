//! Domain types for Kondate
//!
//! - Item: a menu item with its category tags and free-text payload
//! - CategoryPools: per-category ordered candidate lists derived from items
//! - TargetMonth: the calendar month a run schedules
//! - ScheduledDay: one output entry (date, category, item)

pub mod item;
pub mod month;
pub mod scheduled_day;

pub use item::{CategoryPools, Item};
pub use month::TargetMonth;
pub use scheduled_day::ScheduledDay;
