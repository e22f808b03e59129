//! Key-value persistence port shared by the stores.

use std::{collections::HashMap, sync::RwLock};

use fintrack_domain::Settings;
use serde::{de::DeserializeOwned, Serialize};

use crate::CoreError;

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const SETTINGS_KEY: &str = "settings";

/// Every key the application writes, used when resetting all data.
pub const ALL_KEYS: [&str; 3] = [TRANSACTIONS_KEY, BUDGETS_KEY, SETTINGS_KEY];

/// Abstraction over string-valued persistence backends.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// Human-readable backend name for logs.
    fn describe(&self) -> String {
        "key-value store".into()
    }
}

/// Volatile in-process backend for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

/// Reads and deserialises the value stored under `key`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CoreError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialises `value` and stores it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Loads settings, merging stored fields over the defaults.
pub fn load_settings(store: &dyn KeyValueStore) -> Result<Settings, CoreError> {
    Ok(load_json(store, SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), CoreError> {
    save_json(store, SETTINGS_KEY, settings)
}

/// Removes every application key from the backend.
pub fn clear_all(store: &dyn KeyValueStore) -> Result<(), CoreError> {
    for key in ALL_KEYS {
        store.remove(key)?;
    }
    tracing::info!(backend = %store.describe(), "cleared all stored data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
        store.remove("key").unwrap();
        assert!(store.is_empty());
        store.remove("key").expect("removing a missing key is a no-op");
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());

        store.set(SETTINGS_KEY, r#"{"darkMode":true}"#).unwrap();
        let loaded = load_settings(&store).unwrap();
        assert!(loaded.dark_mode);
        assert_eq!(loaded.currency, "$");
    }

    #[test]
    fn clear_all_removes_known_keys_only() {
        let store = MemoryStore::new();
        for key in ALL_KEYS {
            store.set(key, "[]").unwrap();
        }
        store.set("unrelated", "1").unwrap();
        clear_all(&store).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_json_reports_corrupt_values() {
        let store = MemoryStore::new();
        store.set(BUDGETS_KEY, "{not json").unwrap();
        let err = load_json::<Vec<fintrack_domain::Budget>>(&store, BUDGETS_KEY)
            .expect_err("corrupt data must fail");
        assert!(matches!(err, CoreError::Serde(_)));
    }
}
