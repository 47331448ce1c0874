//! Calendar output settings.

use chrono::NaiveTime;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CalendarConfig {
    /// Directory the .ics file is written to.
    pub output_dir: PathBuf,

    /// Prepended to every event title.
    pub title_prefix: String,

    /// Payload field used as the event description.
    pub description_field: Option<String>,

    /// Event start time (`HH:MM`); all-day events when unset.
    pub start: Option<String>,

    /// Event end time (`HH:MM`); required with `start`.
    pub end: Option<String>,

    pub product_id: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            title_prefix: "夕食：".to_string(),
            description_field: Some("メモ".to_string()),
            start: None,
            end: None,
            product_id: "-//kondate//menu rotation//EN".to_string(),
        }
    }
}

impl CalendarConfig {
    /// Parsed event times, or `None` for all-day events.
    pub fn event_times(&self) -> Result<Option<(NaiveTime, NaiveTime)>> {
        match (&self.start, &self.end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                let start = parse_time(start).context("Invalid calendar.start")?;
                let end = parse_time(end).context("Invalid calendar.end")?;
                if end <= start {
                    eyre::bail!("calendar.end must be after calendar.start");
                }
                Ok(Some((start, end)))
            }
            _ => eyre::bail!("calendar.start and calendar.end must be set together"),
        }
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("expected HH:MM, got '{}'", value))
}
