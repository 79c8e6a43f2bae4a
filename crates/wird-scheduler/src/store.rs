//! Persisted key-value store, the only durable state the scheduler touches.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::db::init_db;
use crate::error::StoreError;

/// String-keyed, string-valued, durable across restarts. No transactions:
/// each call is a single get, set or remove.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store (`kv` table).
///
/// Wraps a single connection in a `Mutex`; every operation is one statement.
pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an open connection, creating the schema if needed.
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("store connection lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let db = self.conn()?;
        match db.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        }) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        let now = Utc::now().to_rfc3339();
        db.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        debug!(key, value, "kv set");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        let n = db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        debug!(key, removed = n, "kv remove");
        Ok(())
    }
}

/// In-process store. Not durable; used by tests and throwaway hosts.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_get_missing_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("last_scheduled_date").unwrap(), None);
    }

    #[test]
    fn sqlite_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("last_scheduled_date", "2026-6-9").unwrap();
        store.set("last_scheduled_date", "2026-6-10").unwrap();
        assert_eq!(
            store.get("last_scheduled_date").unwrap().as_deref(),
            Some("2026-6-10")
        );
    }

    #[test]
    fn sqlite_remove_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn sqlite_survives_reopen() {
        let path = std::env::temp_dir().join(format!("wird-kv-{}.db", std::process::id()));
        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("last_scheduled_date", "2026-1-31").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("last_scheduled_date").unwrap().as_deref(),
            Some("2026-1-31")
        );
        drop(store);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
