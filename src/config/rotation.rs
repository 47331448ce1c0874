//! Rotation settings: weekday table, recency policy, weekly limits.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rotation::{DEFAULT_WINDOW, DayCategoryRule, RecencyPolicy, Scheduler, WeeklyTagLimit};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RotationConfig {
    /// Weekday (`mon`..`sun` or `0`..`6`) to category.
    pub weekdays: BTreeMap<String, String>,

    /// Duplicate-avoidance window.
    pub recency: RecencyConfig,

    /// Maximum days per ISO week for items carrying a tag.
    pub weekly_limits: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecencyConfig {
    pub window: usize,
    pub policy: RecencyPolicy,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            policy: RecencyPolicy::AnyDay,
        }
    }
}

impl RotationConfig {
    pub fn rule(&self) -> Result<DayCategoryRule> {
        DayCategoryRule::from_table(&self.weekdays).context("Invalid rotation.weekdays")
    }

    pub fn validate(&self) -> Result<()> {
        self.rule()?;
        if self.recency.window == 0 {
            eyre::bail!("rotation.recency.window must be > 0");
        }
        if self.recency.policy == RecencyPolicy::SameWeekday && self.recency.window < 7 {
            eyre::bail!("rotation.recency.window must be >= 7 for the same-weekday policy");
        }
        if let Some((tag, _)) = self.weekly_limits.iter().find(|(_, max)| **max == 0) {
            eyre::bail!("rotation.weekly-limits.{} must be > 0", tag);
        }
        Ok(())
    }

    /// Build a scheduler from this configuration.
    pub fn scheduler(&self) -> Result<Scheduler> {
        self.validate()?;
        let mut scheduler =
            Scheduler::new(self.rule()?).with_recency(self.recency.policy, self.recency.window);
        for (tag, max) in &self.weekly_limits {
            scheduler = scheduler.with_constraint(WeeklyTagLimit::new(tag.clone(), *max));
        }
        Ok(scheduler)
    }
}
