//! In-memory storage fake for tests and ephemeral sessions.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::Storage;
use crate::{Error, Result};

/// In-memory [`Storage`] implementation.
///
/// Used as the test fake for every store in this crate. Writes can be forced
/// to fail to exercise the best-effort persistence paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Error::Io(io::Error::other("storage quota exceeded")));
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token").await, None);

        storage.set("token", "abc").await.unwrap();
        assert_eq!(storage.get("token").await.as_deref(), Some("abc"));

        storage.remove("token").await.unwrap();
        assert_eq!(storage.get("token").await, None);
    }

    #[tokio::test]
    async fn forced_write_failure() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        assert!(storage.set("token", "abc").await.is_err());
        assert!(storage.is_empty());
    }
}
