//! Durable key-value storage port.
//!
//! The stores in this crate never touch a concrete storage backend directly;
//! they call this port on mutation. Writes are best-effort: a failed write is
//! logged and swallowed, and the in-memory state stays authoritative for the
//! session.

use async_trait::async_trait;

use crate::Result;

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Storage keys used by the console.
pub mod keys {
    /// Variable definitions.
    pub const VARIABLES: &str = "syntellite:variables:v1";
    /// Message templates.
    pub const TEMPLATES: &str = "syntellite:templates:v1";
    /// SMTP provider profiles.
    pub const PROVIDERS: &str = "syntellite:smtp-providers:v1";
    /// Session bearer token.
    pub const TOKEN: &str = "token";
}

/// Durable key-value storage.
///
/// Implementations own their failure handling on read: a malformed or
/// unreadable entry surfaces as `None`, never as an error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; callers treat this as
    /// best-effort and keep their in-memory state.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    async fn remove(&self, key: &str) -> Result<()>;
}
