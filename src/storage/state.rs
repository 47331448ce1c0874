//! Persisted state document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::TargetMonth;
use crate::error::{KondateError, Result};
use crate::rotation::{CategoryIndex, RecencyWindow, RotationState, ScheduleRun};

/// Current on-disk schema version.
pub const STATE_VERSION: u32 = 1;

/// Everything that survives between runs.
///
/// Every field defaults, so documents written by older versions (or with
/// fields removed by hand) still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub version: u32,

    /// Rotation position per category. Categories no longer supplied are
    /// kept but ignored; new categories start at 0.
    pub positions: BTreeMap<String, usize>,

    /// Most recently scheduled item names, oldest first
    pub recent: Vec<String>,

    /// Month produced by the last persisted run
    pub last_month: Option<TargetMonth>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            positions: BTreeMap::new(),
            recent: Vec::new(),
            last_month: None,
            updated_at: None,
        }
    }
}

impl PersistedState {
    /// Reject documents written by a newer schema.
    pub fn check_version(&self) -> Result<()> {
        if self.version > STATE_VERSION {
            return Err(KondateError::Storage(format!(
                "state version {} is newer than supported version {}",
                self.version, STATE_VERSION
            )));
        }
        Ok(())
    }

    /// Rotation state with a recency window of `window` entries.
    pub fn rotation(&self, window: usize) -> RotationState {
        RotationState {
            index: CategoryIndex::from_positions(self.positions.clone()),
            recency: RecencyWindow::from_entries(window, self.recent.iter().cloned()),
        }
    }

    /// State to persist after an accepted run.
    pub fn from_run(run: &ScheduleRun, now: DateTime<Utc>) -> Self {
        Self {
            version: STATE_VERSION,
            positions: run.state.index.positions().clone(),
            recent: run.state.recency.to_vec(),
            last_month: Some(run.month),
            updated_at: Some(now),
        }
    }

    pub fn is_first_run(&self) -> bool {
        self.last_month.is_none() && self.positions.is_empty() && self.recent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_first_run() {
        let state = PersistedState::default();
        assert!(state.is_first_run());
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: PersistedState = serde_json::from_str(r#"{"positions":{"fish":2}}"#).unwrap();
        assert_eq!(state.positions.get("fish"), Some(&2));
        assert!(state.recent.is_empty());
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let state: PersistedState =
            serde_json::from_str(r#"{"version":1,"recent":["a"],"quota":{"fish":2}}"#).unwrap();
        assert_eq!(state.recent, vec!["a".to_string()]);
    }

    #[test]
    fn test_newer_version_rejected() {
        let state = PersistedState {
            version: STATE_VERSION + 1,
            ..Default::default()
        };
        assert!(matches!(state.check_version(), Err(KondateError::Storage(_))));
    }

    #[test]
    fn test_rotation_truncates_recent_to_window() {
        let state = PersistedState {
            recent: (0..9).map(|i| format!("m{}", i)).collect(),
            ..Default::default()
        };
        let rotation = state.rotation(7);
        assert_eq!(rotation.recency.len(), 7);
        assert!(!rotation.recency.is_forbidden("m1"));
        assert!(rotation.recency.is_forbidden("m8"));
    }
}
