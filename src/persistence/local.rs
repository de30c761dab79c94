//! Browser LocalStorage store (wasm32 only)

use super::Store;
use crate::error::{StoreError, StoreResult};

/// Thin wrapper over `window.localStorage`
#[derive(Debug, Clone, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable {
                context: "window.localStorage",
            })
    }
}

impl Store for LocalStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let storage = Self::storage()?;
        storage.get_item(key).map_err(|_| StoreError::Unavailable {
            context: "localStorage.getItem",
        })
    }

    fn save(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let storage = Self::storage()?;
        storage.set_item(key, value).map_err(|_| StoreError::Unavailable {
            context: "localStorage.setItem",
        })
    }
}
