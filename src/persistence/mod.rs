//! Key-value persistence
//!
//! The game only ever stores a handful of small values (the high score and the
//! settings blob), so the store mirrors the browser's `Storage` API: string
//! items keyed by name, with integer helpers layered on top.

use std::collections::HashMap;

use thiserror::Error;

/// Store access failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No backing store (private browsing, storage disabled, ...)
    #[error("storage unavailable")]
    Unavailable,
    #[error("read failed: {0}")]
    Read(String),
    #[error("write failed: {0}")]
    Write(String),
}

/// A string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read an integer item. Values that don't parse count as absent.
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .get_item(key)?
            .and_then(|raw| raw.trim().parse::<i64>().ok()))
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set_item(key, &value.to_string())
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
