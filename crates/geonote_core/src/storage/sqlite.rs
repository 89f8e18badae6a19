//! SQLite-backed storage slots.
//!
//! # Responsibility
//! - Persist slot values in the `kv_slots` table.
//!
//! # Invariants
//! - One row per key; `set` is an upsert that refreshes `updated_at`.
//! - The connection must come from `db::open_db*` so the slot table exists.

use super::{KeyValueStorage, StorageError, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable slots stored in one SQLite database.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - Returns `Unavailable` when the `kv_slots` table is missing.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StorageError::Unavailable(
                "missing required table `kv_slots`".to_string(),
            ));
        }
        Ok(Self { conn })
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_slots ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStorage;
    use crate::storage::{KeyValueStorage, StorageError};
    use rusqlite::Connection;

    #[test]
    fn upsert_replaces_value_for_same_key() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.set("geo-notes", "[]").unwrap();
        storage.set("geo-notes", "[1]").unwrap();
        storage.set("other", "x").unwrap();

        assert_eq!(storage.get("geo-notes").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.keys().unwrap(), vec!["geo-notes", "other"]);

        storage.remove("other").unwrap();
        assert_eq!(storage.get("other").unwrap(), None);
    }

    #[test]
    fn bare_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteStorage::try_new(conn).err().unwrap();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
