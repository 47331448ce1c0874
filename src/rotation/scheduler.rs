//! Month scheduler.
//!
//! For each day of the target month: resolve the category from the weekday
//! rule, take the next non-forbidden item from that category's pool, record
//! it in the recency window, and emit a `ScheduledDay`.

use chrono::Datelike;

use crate::domain::{CategoryPools, ScheduledDay, TargetMonth};
use crate::error::{KondateError, Result};
use crate::rotation::constraint::SelectionConstraint;
use crate::rotation::index::CategoryIndex;
use crate::rotation::recency::{DEFAULT_WINDOW, RecencyPolicy, RecencyWindow};
use crate::rotation::rule::DayCategoryRule;

/// State carried from one run to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    pub index: CategoryIndex,
    pub recency: RecencyWindow,
}

impl RotationState {
    /// Empty state for a first-ever run.
    pub fn new(window: usize) -> Self {
        Self {
            index: CategoryIndex::new(),
            recency: RecencyWindow::new(window),
        }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Output of one scheduler run.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub month: TargetMonth,
    /// One entry per calendar date, in order
    pub days: Vec<ScheduledDay>,
    /// State to persist if the run is accepted
    pub state: RotationState,
    /// Days where no candidate cleared the filters
    pub forced_repeats: usize,
}

/// Assigns one item per day of a month.
#[derive(Debug)]
pub struct Scheduler {
    rule: DayCategoryRule,
    policy: RecencyPolicy,
    window: usize,
    constraints: Vec<Box<dyn SelectionConstraint>>,
}

impl Scheduler {
    /// Create a scheduler with the default any-day policy over a 7-day window.
    pub fn new(rule: DayCategoryRule) -> Self {
        Self {
            rule,
            policy: RecencyPolicy::default(),
            window: DEFAULT_WINDOW,
            constraints: Vec::new(),
        }
    }

    pub fn with_recency(mut self, policy: RecencyPolicy, window: usize) -> Self {
        self.policy = policy;
        self.window = window;
        self
    }

    pub fn with_constraint(mut self, constraint: impl SelectionConstraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn rule(&self) -> &DayCategoryRule {
        &self.rule
    }

    /// Recency window length this scheduler expects persisted state to use.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Schedule every day of `month`.
    ///
    /// `state` is not modified; the advanced state is returned in the
    /// `ScheduleRun`. Any error aborts the whole run.
    pub fn run(
        &self,
        state: &RotationState,
        pools: &CategoryPools,
        month: TargetMonth,
    ) -> Result<ScheduleRun> {
        let mut index = state.index.clone();
        let mut recency = if state.recency.capacity() == self.window {
            state.recency.clone()
        } else {
            RecencyWindow::from_entries(self.window, state.recency.entries())
        };

        let mut days: Vec<ScheduledDay> = Vec::with_capacity(month.days_in_month());
        let mut forced_repeats = 0;

        for date in month.days() {
            let category = self.rule.category_for(date.weekday());
            let pool = pools.get(category).unwrap_or(&[]);

            let selection = index
                .select_next(category, pool, |candidate| {
                    self.policy.forbids(&recency, &candidate.name)
                        || self.constraints.iter().any(|c| c.forbids(candidate, date, &days))
                })
                .ok_or_else(|| KondateError::EmptyCategory {
                    category: category.to_string(),
                    date,
                })?;

            if selection.forced_repeat {
                forced_repeats += 1;
                log::warn!(
                    "{}: no eligible item in '{}', repeating '{}'",
                    date,
                    category,
                    selection.item.name
                );
            } else {
                log::debug!("{}: {} -> {}", date, category, selection.item.name);
            }

            recency.record(selection.item.name.clone());
            days.push(ScheduledDay {
                date,
                category: category.to_string(),
                item: selection.item.clone(),
            });
        }

        log::info!(
            "Scheduled {} days for {} ({} forced repeats)",
            days.len(),
            month,
            forced_repeats
        );

        Ok(ScheduleRun {
            month,
            days,
            state: RotationState { index, recency },
            forced_repeats,
        })
    }
}
