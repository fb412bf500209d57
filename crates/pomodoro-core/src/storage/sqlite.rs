//! SQLite-backed slot.
//!
//! The record lives in a `kv` table so the same database file can hold other
//! keys later without a schema change.

use std::path::Path;

use rusqlite::{params, Connection};

use super::slot::{StateSlot, STATE_KEY};
use crate::error::PersistenceError;

pub struct SqliteSlot {
    conn: Connection,
    location: String,
}

impl SqliteSlot {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn, path.display().to_string())
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".into())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self, PersistenceError> {
        let slot = Self { conn, location };
        slot.migrate()?;
        Ok(slot)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }
}

impl StateSlot for SqliteSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![STATE_KEY], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![STATE_KEY, contents],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}#{}", self.location, STATE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip() {
        let mut slot = SqliteSlot::open_memory().unwrap();
        assert!(slot.read().unwrap().is_none());
        slot.write("hello").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("hello"));
        slot.write("again").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("again"));
    }

    #[test]
    fn other_keys_are_left_alone() {
        let mut slot = SqliteSlot::open_memory().unwrap();
        slot.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES ('other', 'untouched')",
                [],
            )
            .unwrap();
        slot.write("x").unwrap();
        assert_eq!(slot.describe(), format!(":memory:#{STATE_KEY}"));
        assert_eq!(slot.read().unwrap().as_deref(), Some("x"));
        let other: String = slot
            .conn
            .query_row("SELECT value FROM kv WHERE key = 'other'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(other, "untouched");
    }

    #[test]
    fn persists_across_connections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pomodoro.db");
        {
            let mut slot = SqliteSlot::open(&path).unwrap();
            slot.write("kept").unwrap();
        }
        let slot = SqliteSlot::open(&path).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("kept"));
    }
}
