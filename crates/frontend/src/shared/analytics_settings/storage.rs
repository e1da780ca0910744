//! Durable copy of the analytics settings.
//!
//! Persistence is best effort: every failure is logged and swallowed, the
//! in-memory value held by the accessor stays authoritative.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use contracts::shared::analytics_settings::SettingsDomain;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available in this context")]
    Unavailable,
    #[error("failed to read '{key}': {message}")]
    Read { key: String, message: String },
    #[error("failed to write '{key}': {message}")]
    Write { key: String, message: String },
    #[error("failed to remove '{key}': {message}")]
    Remove { key: String, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("stored value under '{key}' is not a settings object: {message}")]
    Deserialize { key: String, message: String },
}

/// String key-value surface shared by every settings domain.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// Browser localStorage
// ============================================================================

/// `window.localStorage`. Outside a browser every call is `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or(StorageError::Unavailable)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Err(StorageError::Unavailable)
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Remove {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-process store. Clones share the same entries.
///
/// `fail_writes` simulates a full or read-only storage (quota exceeded).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that can be read but rejects every write and removal.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn lock(&self, key: &str) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Read {
            key: key.to_string(),
            message: "memory storage lock poisoned".to_string(),
        })
    }

    fn reject_write(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.reject_write(key)?;
        self.lock(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.reject_write(key)?;
        self.lock(key)?.remove(key);
        Ok(())
    }
}

// ============================================================================
// Store adapter
// ============================================================================

fn report<D: SettingsDomain>(operation: &str, err: &StorageError) {
    match err {
        StorageError::Unavailable => {
            log::debug!("{} settings {}: {}", D::TITLE, operation, err)
        }
        _ => log::warn!("{} settings {} failed: {}", D::TITLE, operation, err),
    }
}

fn try_load<D: SettingsDomain>(store: &dyn KeyValueStore) -> Result<Option<D::Partial>, StorageError> {
    let Some(raw) = store.get_item(D::STORAGE_KEY)? else {
        return Ok(None);
    };
    let deserialize_error = |message: String| StorageError::Deserialize {
        key: D::STORAGE_KEY.to_string(),
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| deserialize_error(e.to_string()))?;
    if !value.is_object() {
        return Err(deserialize_error("expected a JSON object".to_string()));
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| deserialize_error(e.to_string()))
}

/// Read the persisted, possibly partial settings of domain `D`.
///
/// Absent entries, missing storage and unparseable values all yield `None`.
pub fn load<D: SettingsDomain>(store: &dyn KeyValueStore) -> Option<D::Partial> {
    match try_load::<D>(store) {
        Ok(partial) => partial,
        Err(err) => {
            report::<D>("load", &err);
            None
        }
    }
}

/// Persist `config` under the domain key. Failures are logged only.
pub fn save<D: SettingsDomain>(store: &dyn KeyValueStore, config: &D::Config) {
    let result = serde_json::to_string(config)
        .map_err(StorageError::from)
        .and_then(|raw| store.set_item(D::STORAGE_KEY, &raw));
    if let Err(err) = result {
        report::<D>("save", &err);
    }
}

/// Remove the durable entry of domain `D`.
pub fn clear<D: SettingsDomain>(store: &dyn KeyValueStore) {
    if let Err(err) = store.remove_item(D::STORAGE_KEY) {
        report::<D>("clear", &err);
    }
}

/// Clear the durable entry and return a fresh Default Table.
pub fn reset_to_defaults<D: SettingsDomain>(store: &dyn KeyValueStore) -> D::Config {
    clear::<D>(store);
    log::debug!("{} settings reset to defaults", D::TITLE);
    D::defaults()
}
