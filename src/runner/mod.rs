//! One monthly run: load state, schedule, render, save.
//!
//! State is saved only after the schedule succeeded and the calendar file (if
//! any) was written. A failure at any step leaves the stored state exactly as
//! it was loaded.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::calendar::{IcsRenderer, write_calendar};
use crate::domain::{CategoryPools, Item, TargetMonth};
use crate::error::Result;
use crate::rotation::{ScheduleRun, Scheduler};
use crate::source::ItemSource;
use crate::storage::{PersistedState, StateStore};

/// Where and how to write the calendar file.
#[derive(Debug, Clone)]
pub struct CalendarOutput {
    pub renderer: IcsRenderer,
    pub dir: PathBuf,
}

/// Result of a monthly run.
#[derive(Debug, Clone)]
pub struct MonthReport {
    pub schedule: ScheduleRun,
    /// Month of the previous persisted run, if any
    pub previous_month: Option<TargetMonth>,
    pub calendar_path: Option<PathBuf>,
    /// Whether the new state was saved
    pub persisted: bool,
}

impl MonthReport {
    /// True when the previous run was not the month right before this one.
    pub fn is_discontinuous(&self) -> bool {
        match self.previous_month {
            Some(prev) => prev.next().map(|m| m != self.schedule.month).unwrap_or(true),
            None => false,
        }
    }
}

/// Drives StateStore.load → Scheduler.run → StateStore.save.
pub struct MonthlyRun<'a> {
    store: &'a dyn StateStore,
    scheduler: &'a Scheduler,
    output: Option<CalendarOutput>,
    dry_run: bool,
}

impl<'a> MonthlyRun<'a> {
    pub fn new(store: &'a dyn StateStore, scheduler: &'a Scheduler) -> Self {
        Self {
            store,
            scheduler,
            output: None,
            dry_run: false,
        }
    }

    pub fn with_output(mut self, output: CalendarOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Schedule without writing the calendar or saving state.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fetch items from `source` and run.
    pub async fn execute(
        &self,
        source: &dyn ItemSource,
        month: TargetMonth,
    ) -> Result<MonthReport> {
        log::info!("Fetching items from {}", source.describe());
        let items = source.fetch().await?;
        self.execute_with_items(&items, month, Utc::now())
    }

    /// Run over an already-fetched item list. `now` stamps the calendar and state.
    pub fn execute_with_items(
        &self,
        items: &[Item],
        month: TargetMonth,
        now: DateTime<Utc>,
    ) -> Result<MonthReport> {
        let persisted = self.store.load()?;
        let previous_month = persisted.last_month;
        if let Some(prev) = previous_month
            && prev.next().ok() != Some(month)
        {
            log::warn!("Last run generated {}, now generating {}", prev, month);
        }

        let pools = CategoryPools::from_items(items);
        let schedule = self
            .scheduler
            .run(&persisted.rotation(self.scheduler.window()), &pools, month)?;

        if self.dry_run {
            log::info!("Dry run: nothing written for {}", month);
            return Ok(MonthReport {
                schedule,
                previous_month,
                calendar_path: None,
                persisted: false,
            });
        }

        let calendar_path = match &self.output {
            Some(output) => {
                let text = output.renderer.render(&schedule.days, now);
                Some(write_calendar(&output.dir, month, &text)?)
            }
            None => None,
        };

        self.store.save(&PersistedState::from_run(&schedule, now))?;

        Ok(MonthReport {
            schedule,
            previous_month,
            calendar_path,
            persisted: true,
        })
    }
}
