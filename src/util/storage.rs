//! Key-value storage seam for persisted session entries.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store only ever needs string get/set/remove. The browser build
//! backs this with `localStorage`; `MemoryStore` stands in everywhere else.
//!
//! ERROR HANDLING
//! ==============
//! Reads and removes are best-effort and log failures. Writes report a
//! refused `localStorage` write (quota, privacy mode) as a [`StorageError`]
//! so the caller can roll back a half-written session.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

/// A write the backing store refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("storage write failed for {key}: {reason}")]
pub struct StorageError {
    pub key: String,
    pub reason: String,
}

impl StorageError {
    pub fn new(key: &str, reason: impl Into<String>) -> Self {
        Self { key: key.to_owned(), reason: reason.into() }
    }
}

/// Synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the value was not stored.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// In-memory store for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Browser `localStorage`, resolved on each call.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(feature = "hydrate")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                leptos::logging::warn!("localStorage unavailable: {e:?}");
                None
            }
        }
    }
}

#[cfg(feature = "hydrate")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        match Self::storage()?.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                leptos::logging::warn!("localStorage read failed: key={key} {e:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or_else(|| StorageError::new(key, "localStorage unavailable"))?;
        storage.set_item(key, value).map_err(|e| StorageError::new(key, format!("{e:?}")))
    }

    fn remove(&self, key: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.remove_item(key) {
            leptos::logging::warn!("localStorage remove failed: key={key} {e:?}");
        }
    }
}
