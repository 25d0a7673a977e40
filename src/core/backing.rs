//! Physical backing maps for the namespaced store facade.
//!
//! A backing map is a flat string-keyed, string-valued persistent map shared by
//! every [`crate::core::store::Store`] in the process. The handle is created once
//! at startup and injected into each store; stores never own the map.

use crate::core::db;
use crate::core::error;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

/// Flat persistent string map shared by all namespaces.
///
/// Implementations serialize individual operations; compound sequences built on
/// top of these primitives (clear-then-rewrite) are not atomic.
pub trait BackingMap: Send + Sync {
    /// Raw value stored at `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, error::InterimError>;

    /// Insert or overwrite the raw value at `key`.
    fn write(&self, key: &str, raw: &str) -> Result<(), error::InterimError>;

    /// Remove `key` if present. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), error::InterimError>;

    /// Physical existence of `key`, regardless of the stored value.
    fn contains(&self, key: &str) -> Result<bool, error::InterimError>;

    /// Every physical key in the map, across all namespaces.
    fn keys(&self) -> Result<Vec<String>, error::InterimError>;
}

/// In-memory backing map for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryMap {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingMap for MemoryMap {
    fn read(&self, key: &str) -> Result<Option<String>, error::InterimError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> Result<(), error::InterimError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), error::InterimError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, error::InterimError> {
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, error::InterimError> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }
}

/// SQLite-backed persistent map over the flat `kv` table in `store.db`.
pub struct SqliteMap {
    conn: Mutex<Connection>,
}

impl SqliteMap {
    /// Open (and initialize if needed) the map at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, error::InterimError> {
        let conn = db::db_connect(&db_path.to_string_lossy())?;
        conn.execute(db::STORE_DB_SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl BackingMap for SqliteMap {
    fn read(&self, key: &str) -> Result<Option<String>, error::InterimError> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(raw)
    }

    fn write(&self, key: &str, raw: &str) -> Result<(), error::InterimError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), error::InterimError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, error::InterimError> {
        let conn = self.conn.lock().unwrap();
        let found = conn
            .query_row("SELECT 1 FROM kv WHERE key = ?1", params![key], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn keys(&self) -> Result<Vec<String>, error::InterimError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
