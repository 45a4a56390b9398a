//! SQLite blob adapter: a single key/value table.

use crate::domain::config_validation::pool_size;
use crate::domain::error::JournalError;
use crate::ports::blob_port::BlobPort;
use crate::ports::config_port::ConfigPort;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let db_path = config.require_string("sqlite", "path")?;
        let pool_size = pool_size(config)?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| JournalError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, JournalError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| JournalError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, JournalError> {
        self.pool.get().map_err(|e: r2d2::Error| JournalError::Storage {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), JournalError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e: rusqlite::Error| JournalError::StorageQuery {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

impl BlobPort for SqliteAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, JournalError> {
        let conn = self.connection()?;
        let value: Option<String> = conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e: rusqlite::Error| JournalError::StorageQuery {
                reason: e.to_string(),
            })?;
        debug!(key, found = value.is_some(), "sqlite blob read");
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), JournalError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e: rusqlite::Error| JournalError::StorageQuery {
            reason: e.to_string(),
        })?;
        debug!(key, bytes = value.len(), "sqlite blob written");
        Ok(())
    }
}
