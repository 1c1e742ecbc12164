//! SQLite-backed storage.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::warn;

use super::Storage;
use crate::Result;

/// SQLite [`Storage`] implementation.
///
/// A single key-value table; one database file serves the whole console.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a storage backed by the given database path.
    ///
    /// Creates the database and table if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation
    /// fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let storage = Self { pool };
        storage.initialize().await?;
        Ok(storage)
    }

    /// Create a storage at the platform data directory
    /// (`<data_dir>/syntellite/console.db`), creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// connection fails.
    pub async fn open_default() -> Result<Self> {
        let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        path.push("syntellite");
        std::fs::create_dir_all(&path)?;
        path.push("console.db");
        Self::new(&path.to_string_lossy()).await
    }

    /// Create an in-memory storage for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation
    /// fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self { pool };
        storage.initialize().await?;
        Ok(storage)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Option<String> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await;

        match row {
            Ok(row) => row.map(|row| row.get("value")),
            Err(error) => {
                warn!("storage read failed for {key}: {error}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        assert_eq!(storage.get("syntellite:variables:v1").await, None);

        storage.set("syntellite:variables:v1", "{}").await.unwrap();
        assert_eq!(
            storage.get("syntellite:variables:v1").await.as_deref(),
            Some("{}")
        );

        storage.set("syntellite:variables:v1", "{\"a\":1}").await.unwrap();
        assert_eq!(
            storage.get("syntellite:variables:v1").await.as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove("syntellite:variables:v1").await.unwrap();
        assert_eq!(storage.get("syntellite:variables:v1").await, None);
    }
}
