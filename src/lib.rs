//! Kondate - monthly menu rotation scheduler
//!
//! Assigns one menu item per day of a month from per-category pools,
//! following a weekday → category table. Rotation positions and the
//! trailing window of recently used items persist between runs, so
//! successive months behave as one continuous, non-repeating sequence.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod rotation;
pub mod runner;
pub mod source;
pub mod storage;

pub use error::{KondateError, Result};
