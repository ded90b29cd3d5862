//! Persisted notification content and the notifications-enabled flag.
//!
//! The store keeps its state in memory and writes it through to an injected
//! [`KeyValueStore`] on every mutation. Backend failures are logged and
//! otherwise ignored: losing notification text only degrades entry
//! notifications to the generic fallback.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key holding the identifier -> content map.
pub const NOTIFICATIONS_KEY: &str = "region_notifications";
/// Key holding the global notifications-enabled flag.
pub const NOTIFICATIONS_ENABLED_KEY: &str = "notifications_enabled";

/// Durable key-value storage.
/// Implemented by the storage layer, allowing the registry to remain decoupled.
pub trait KeyValueStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error>;
    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

/// Title and body shown when the device enters a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("memory store rejected write to {0}")]
pub struct MemoryStoreError(String);

/// In-memory backend.
///
/// Clones share the same data, so a test can drop a store and open a new one
/// over the same backend to simulate a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
    fail_writes: Arc<Mutex<bool>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), Self::Error> {
        if *self.fail_writes.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(MemoryStoreError(key.to_string()));
        }
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

/// Notification content per region identifier plus the enabled flag.
pub struct NotificationStore<S: KeyValueStore> {
    backend: S,
    contents: BTreeMap<String, NotificationContent>,
    enabled: bool,
}

impl<S: KeyValueStore> NotificationStore<S> {
    /// Open the store, loading persisted state from `backend`.
    pub fn open(backend: S) -> Self {
        let mut store = Self {
            backend,
            contents: BTreeMap::new(),
            enabled: true,
        };
        store.reload();
        store
    }

    /// Re-read all state from the backend.
    pub fn reload(&mut self) {
        self.contents = match self.backend.get(NOTIFICATIONS_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding malformed notification content");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load notification content");
                BTreeMap::new()
            }
        };

        self.enabled = match self.backend.get(NOTIFICATIONS_ENABLED_KEY) {
            Ok(Some(value)) => value.as_bool().unwrap_or(true),
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load notifications flag");
                true
            }
        };

        tracing::debug!(
            regions = self.contents.len(),
            enabled = self.enabled,
            "notification_store_loaded"
        );
    }

    pub fn get(&self, identifier: &str) -> Option<&NotificationContent> {
        self.contents.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Store content for `identifier`. Returns true if the map changed.
    pub fn insert(&mut self, identifier: &str, content: NotificationContent) -> bool {
        if self.contents.get(identifier) == Some(&content) {
            return false;
        }
        self.contents.insert(identifier.to_string(), content);
        self.persist_contents();
        true
    }

    /// Remove content for `identifier`. Returns true if an entry was removed.
    pub fn remove(&mut self, identifier: &str) -> bool {
        if self.contents.remove(identifier).is_none() {
            return false;
        }
        self.persist_contents();
        true
    }

    /// Remove all content. Returns true if the map was non-empty.
    pub fn clear(&mut self) -> bool {
        if self.contents.is_empty() {
            return false;
        }
        self.contents.clear();
        self.persist_contents();
        true
    }

    /// Keep only entries whose identifier satisfies `keep`. Returns the
    /// number of removed entries.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.contents.len();
        self.contents.retain(|identifier, _| keep(identifier));
        let removed = before - self.contents.len();
        if removed > 0 {
            self.persist_contents();
        }
        removed
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if let Err(e) = self
            .backend
            .set(NOTIFICATIONS_ENABLED_KEY, Value::Bool(enabled))
        {
            tracing::warn!(error = %e, "failed to persist notifications flag");
        }
    }

    fn persist_contents(&self) {
        let value = match serde_json::to_value(&self.contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode notification content");
                return;
            }
        };
        if let Err(e) = self.backend.set(NOTIFICATIONS_KEY, value) {
            tracing::warn!(error = %e, "failed to persist notification content");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_on_empty_backend() {
        let store = NotificationStore::open(MemoryStore::new());
        assert!(store.is_empty());
        assert!(store.enabled());
    }

    #[test]
    fn test_insert_persists_nested_map() {
        let backend = MemoryStore::new();
        let mut store = NotificationStore::open(backend.clone());

        assert!(store.insert("home", NotificationContent::new("T", "B")));

        let persisted = backend.get(NOTIFICATIONS_KEY).unwrap().unwrap();
        assert_eq!(persisted, json!({"home": {"title": "T", "body": "B"}}));
    }

    #[test]
    fn test_identical_insert_skips_write() {
        let backend = MemoryStore::new();
        let mut store = NotificationStore::open(backend.clone());

        store.insert("home", NotificationContent::new("T", "B"));
        assert!(!store.insert("home", NotificationContent::new("T", "B")));
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_clear_on_empty_map_skips_write() {
        let backend = MemoryStore::new();
        let mut store = NotificationStore::open(backend.clone());

        assert!(!store.clear());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_remove_missing_skips_write() {
        let backend = MemoryStore::new();
        let mut store = NotificationStore::open(backend.clone());

        assert!(!store.remove("nope"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_reopen_restores_state() {
        let backend = MemoryStore::new();
        {
            let mut store = NotificationStore::open(backend.clone());
            store.insert("home", NotificationContent::new("T", "B"));
            store.set_enabled(false);
        }

        let store = NotificationStore::open(backend);
        assert_eq!(store.get("home"), Some(&NotificationContent::new("T", "B")));
        assert!(!store.enabled());
    }

    #[test]
    fn test_malformed_content_falls_back_to_empty() {
        let backend = MemoryStore::new();
        backend
            .set(NOTIFICATIONS_KEY, json!(["not", "a", "map"]))
            .unwrap();
        backend
            .set(NOTIFICATIONS_ENABLED_KEY, json!("yes"))
            .unwrap();

        let store = NotificationStore::open(backend);
        assert!(store.is_empty());
        assert!(store.enabled());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let backend = MemoryStore::new();
        let mut store = NotificationStore::open(backend.clone());
        backend.set_fail_writes(true);

        assert!(store.insert("home", NotificationContent::new("T", "B")));
        assert_eq!(store.get("home").map(|c| c.title.as_str()), Some("T"));
        assert_eq!(backend.get(NOTIFICATIONS_KEY).unwrap(), None);
    }

    #[test]
    fn test_retain_drops_unknown_entries() {
        let mut store = NotificationStore::open(MemoryStore::new());
        store.insert("a", NotificationContent::new("1", "1"));
        store.insert("b", NotificationContent::new("2", "2"));

        let removed = store.retain(|id| id == "a");
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
    }
}
