//! State store trait definitions.

use std::sync::Mutex;

use super::state::PersistedState;
use crate::error::{KondateError, Result};

/// Load/save of the state carried between runs.
pub trait StateStore: Send + Sync {
    /// Load persisted state, or an empty state on the first run.
    fn load(&self) -> Result<PersistedState>;

    /// Replace persisted state with `state`, all or nothing.
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: Mutex<Option<PersistedState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            inner: Mutex::new(Some(state)),
        }
    }

    /// The saved state, if anything was saved or seeded.
    pub fn snapshot(&self) -> Result<Option<PersistedState>> {
        Ok(self.inner.lock().map_err(|e| KondateError::Storage(e.to_string()))?.clone())
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<PersistedState> {
        Ok(self.snapshot()?.unwrap_or_default())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.inner.lock().map_err(|e| KondateError::Storage(e.to_string()))? = Some(state.clone());
        Ok(())
    }
}
