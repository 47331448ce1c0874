//! JSON file state store with atomic replace.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::state::PersistedState;
use super::traits::StateStore;
use crate::error::{KondateError, Result};

/// State persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    /// Remove the state file, returning to first-run behavior.
    pub fn reset(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        log::info!("Removed state file {}", self.path.display());
        Ok(true)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            log::info!("No state at {}, starting fresh", self.path.display());
            return Ok(PersistedState::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let state: PersistedState = serde_json::from_str(&content).map_err(|e| {
            KondateError::Storage(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        state.check_version()?;

        log::debug!(
            "Loaded state from {} ({} categories, {} recent)",
            self.path.display(),
            state.positions.len(),
            state.recent.len()
        );
        Ok(state)
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| {
            KondateError::Storage(format!(
                "failed to move {} into place at {}: {}",
                tmp.display(),
                self.path.display(),
                e
            ))
        })?;

        log::info!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetMonth;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonStateStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStateStore::new(temp_dir.path().join("nested").join("state.json"));
        (store, temp_dir)
    }

    fn sample_state() -> PersistedState {
        PersistedState {
            positions: [("fish".to_string(), 2), ("meat".to_string(), 0)].into_iter().collect(),
            recent: vec!["saba".to_string(), "curry".to_string()],
            last_month: Some(TargetMonth::new(2025, 3).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _temp) = create_test_store();
        let state = store.load().unwrap();
        assert!(state.is_first_run());
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = create_test_store();
        let state = sample_state();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_replaces_previous() {
        let (store, _temp) = create_test_store();
        store.save(&sample_state()).unwrap();

        let mut next = sample_state();
        next.recent.push("ramen".to_string());
        store.save(&next).unwrap();

        assert_eq!(store.load().unwrap().recent.len(), 3);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(KondateError::Storage(_))));
    }

    #[test]
    fn test_stale_temp_file_does_not_affect_load() {
        let (store, _temp) = create_test_store();
        store.save(&sample_state()).unwrap();
        fs::write(store.temp_path(), "partial wri").unwrap();
        assert_eq!(store.load().unwrap(), sample_state());
    }

    #[test]
    fn test_newer_version_rejected() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"version": 99}"#).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_reset() {
        let (store, _temp) = create_test_store();
        assert!(!store.reset().unwrap());
        store.save(&sample_state()).unwrap();
        assert!(store.reset().unwrap());
        assert!(store.load().unwrap().is_first_run());
    }
}
