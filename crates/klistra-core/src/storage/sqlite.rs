//! SQLite-backed paste store.
//!
//! One table, `pastes(id, data, expires_at)`, with expiry kept as unix
//! seconds so the sweep is a single indexed range delete.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{KlistraError, Result};
use crate::storage::traits::PasteStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pastes (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    expires_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_pastes_expires_at ON pastes(expires_at);
"#;

/// SQLite paste store.
pub struct SqlitePasteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqlitePasteStore {
    /// Open (or create) a database file, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    KlistraError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used for expiry decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of rows currently held, expired or not.
    pub fn row_count(&self) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pastes", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| KlistraError::Storage(format!("Invalid row count: {}", count)))
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| KlistraError::Storage("SQLite connection poisoned".to_string()))
    }
}

impl PasteStore for SqlitePasteStore {
    fn expires_at(&self, ttl: Duration) -> Result<i64> {
        if ttl.as_secs() == 0 {
            return Err(KlistraError::InvalidInput(
                "TTL must be at least one second".to_string(),
            ));
        }
        i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| self.clock.unix_now().checked_add(secs))
            .ok_or_else(|| KlistraError::InvalidInput("TTL is too large".to_string()))
    }

    fn put(&self, id: &str, record: &str, ttl: Duration) -> Result<()> {
        let expires_at = self.expires_at(ttl)?;
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO pastes (id, data, expires_at) VALUES (?1, ?2, ?3)",
            params![id, record, expires_at],
        )?;
        debug!(expires_at, "stored paste");
        Ok(())
    }

    fn insert_new(&self, id: &str, record: &str, expires_at: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO pastes (id, data, expires_at) VALUES (?1, ?2, ?3)",
            params![id, record, expires_at],
        )?;
        if inserted == 0 {
            return Err(KlistraError::Conflict(id.to_string()));
        }
        debug!(expires_at, "inserted paste");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<String> {
        let now = self.clock.unix_now();
        let conn = self.lock_conn()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT data, expires_at FROM pastes WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            None => Err(KlistraError::NotFound(id.to_string())),
            Some((_, expires_at)) if now > expires_at => {
                conn.execute("DELETE FROM pastes WHERE id = ?1", params![id])?;
                debug!(expires_at, "evicted expired paste on read");
                Err(KlistraError::NotFound(id.to_string()))
            }
            Some((data, _)) => Ok(data),
        }
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let found = conn
            .query_row("SELECT 1 FROM pastes WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM pastes WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn sweep(&self) -> Result<usize> {
        let now = self.clock.unix_now();
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM pastes WHERE expires_at < ?1", params![now])?;
        debug!(removed, "swept expired pastes");
        Ok(removed)
    }
}
