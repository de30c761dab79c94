//! Save/load persistence
//!
//! The simulation never touches storage. Hosts wire a [`Store`] into the
//! collaborators that need one (tuning, settings, high scores):
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one file per key in a directory (native)
//! - `LocalStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;

use crate::error::StoreResult;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// A string key/value store for plain persisted values
pub trait Store {
    /// Load the value stored under `key`, `None` if never saved
    fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Volatile store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
