//! Persistence of rotation state between runs.
//!
//! One versioned JSON document holds the per-category positions, the
//! recency window, and the last month generated. Saves are atomic: the
//! previous document stays valid until the new one is fully on disk.

mod json;
mod state;
mod traits;

pub use json::JsonStateStore;
pub use state::{PersistedState, STATE_VERSION};
pub use traits::{MemoryStateStore, StateStore};
