//! Browser LocalStorage store (WASM only)

use super::{KeyValueStore, StoreError};

/// Keys are stored verbatim, one LocalStorage entry each
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|_| StoreError::Unavailable(format!("failed to read {}", key)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable(format!("failed to write {}", key)))
    }
}
