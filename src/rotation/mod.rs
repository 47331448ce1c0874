//! Rotation scheduling core.
//!
//! This module provides:
//! - **DayCategoryRule**: weekday → category table, validated to cover all 7 days.
//! - **CategoryIndex**: persisted per-category rotation positions with
//!   bounded-probe duplicate avoidance.
//! - **RecencyWindow**: the trailing names of the most recently scheduled days,
//!   carried across runs so month boundaries do not repeat.
//! - **Constraints**: optional rules layered on the forbidden check
//!   (e.g. weekly tag limits).
//! - **Scheduler**: walks the days of a month and assigns one item per day.
//!
//! The scheduler is deterministic: identical state and pools produce identical
//! output. It never mutates the state it was handed; a run returns the new
//! state, and the caller decides whether to persist it.

mod constraint;
mod index;
mod recency;
mod rule;
mod scheduler;

pub use constraint::{SelectionConstraint, WeeklyTagLimit};
pub use index::{CategoryIndex, Selection};
pub use recency::{DEFAULT_WINDOW, RecencyPolicy, RecencyWindow};
pub use rule::DayCategoryRule;
pub use scheduler::{RotationState, ScheduleRun, Scheduler};
