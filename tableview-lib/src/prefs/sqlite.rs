//! SQLite preference backend with in-memory cache.

use std::path::Path;
use std::sync::Mutex;

use dashmap::DashMap;
use rusqlite::Connection;
use rusqlite::OptionalExtension;

use super::PreferenceBackend;
use crate::error::PreferenceError;

/// SQLite-backed preference storage with DashMap cache.
///
/// Values are cached after the first read, so rows changed by another
/// process are only seen after reopening.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    cache: DashMap<String, String>,
}

impl SqliteBackend {
    /// Open (or create) a preference database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self, PreferenceError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, PreferenceError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            cache: DashMap::new(),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, PreferenceError> {
        let conn = self.conn.lock().map_err(|_| PreferenceError::Poisoned)?;
        Ok(f(&conn)?)
    }
}

impl PreferenceBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        // Check cache first
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let result = self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, &value],
            )
        })?;

        self.cache.insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.with_conn(|conn| conn.execute("DELETE FROM preferences WHERE key = ?", [key]))?;

        self.cache.remove(key);

        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PreferenceError> {
        let pattern = format!("{}%", prefix);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM preferences WHERE key LIKE ? ORDER BY key")?;
            let rows = stmt.query_map([&pattern], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }
}
