//! Trailing window of recently scheduled item names.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default window length: one week of days.
pub const DEFAULT_WINDOW: usize = 7;

/// Which recently scheduled names are forbidden today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecencyPolicy {
    /// Anything scheduled within the window
    #[default]
    AnyDay,
    /// Only the item scheduled on the same weekday one week ago
    SameWeekday,
}

impl RecencyPolicy {
    pub fn forbids(&self, window: &RecencyWindow, name: &str) -> bool {
        match self {
            RecencyPolicy::AnyDay => window.is_forbidden(name),
            RecencyPolicy::SameWeekday => window.scheduled_days_ago(7) == Some(name),
        }
    }
}

/// FIFO of the most recent scheduled names, oldest first.
///
/// Carried unchanged from the end of one run to the start of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyWindow {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl RecencyWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Restore a window from persisted names, keeping only the newest `capacity`.
    pub fn from_entries<I, S>(capacity: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut window = Self::new(capacity);
        for name in entries {
            window.record(name);
        }
        window
    }

    pub fn is_forbidden(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    /// Name scheduled `days` days before the next one, if the window reaches back that far.
    pub fn scheduled_days_ago(&self, days: usize) -> Option<&str> {
        if days == 0 || days > self.entries.len() {
            return None;
        }
        self.entries.get(self.entries.len() - days).map(String::as_str)
    }

    pub fn record(&mut self, name: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(name.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_drops_oldest() {
        let mut window = RecencyWindow::new(3);
        for name in ["a", "b", "c", "d"] {
            window.record(name);
        }
        assert_eq!(window.entries().collect::<Vec<_>>(), vec!["b", "c", "d"]);
        assert!(!window.is_forbidden("a"));
        assert!(window.is_forbidden("d"));
    }

    #[test]
    fn test_from_entries_truncates_to_capacity() {
        let names: Vec<String> = (0..10).map(|i| format!("m{}", i)).collect();
        let window = RecencyWindow::from_entries(DEFAULT_WINDOW, names);
        assert_eq!(window.len(), 7);
        assert_eq!(window.entries().next(), Some("m3"));
    }

    #[test]
    fn test_scheduled_days_ago() {
        let days = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
        let window = RecencyWindow::from_entries(7, days);
        assert_eq!(window.scheduled_days_ago(1), Some("sun"));
        assert_eq!(window.scheduled_days_ago(7), Some("mon"));
        assert_eq!(window.scheduled_days_ago(8), None);
        assert_eq!(window.scheduled_days_ago(0), None);
    }

    #[test]
    fn test_policy_any_day() {
        let window = RecencyWindow::from_entries(7, ["a", "b"]);
        assert!(RecencyPolicy::AnyDay.forbids(&window, "a"));
        assert!(!RecencyPolicy::AnyDay.forbids(&window, "c"));
    }

    #[test]
    fn test_policy_same_weekday_only_checks_a_week_back() {
        let partial = RecencyWindow::from_entries(7, ["a", "b"]);
        assert!(!RecencyPolicy::SameWeekday.forbids(&partial, "a"));

        let full = RecencyWindow::from_entries(7, ["a", "b", "c", "d", "e", "f", "g"]);
        assert!(RecencyPolicy::SameWeekday.forbids(&full, "a"));
        assert!(!RecencyPolicy::SameWeekday.forbids(&full, "g"));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut window = RecencyWindow::new(0);
        window.record("a");
        assert!(window.is_empty());
    }

    #[test]
    fn test_policy_serde_kebab_case() {
        let policy: RecencyPolicy = serde_yaml::from_str("same-weekday").unwrap();
        assert_eq!(policy, RecencyPolicy::SameWeekday);
        assert_eq!(RecencyPolicy::default(), RecencyPolicy::AnyDay);
    }
}
