//! SQLite-based slot storage.
//!
//! All durable state lives in a single `kv` table:
//! - `fasting_records`: JSON array of completed fasts
//! - `selected_fasting_plan`: plan id
//! - `active_fast_session`: JSON of the fast in progress

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::debug;

use super::{data_dir, KvStore};
use crate::error::DatabaseError;

/// SQLite database holding the key-value slots.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/fastwindow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("fastwindow.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }
}

impl KvStore for Database {
    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn kv_remove_deletes_slot() {
        let db = Database::open_memory().unwrap();
        db.kv_set("gone", "1").unwrap();
        db.kv_remove("gone").unwrap();
        assert!(db.kv_get("gone").unwrap().is_none());
        db.kv_remove("never-there").unwrap();
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fastwindow.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.kv_set("selected_fasting_plan", "18:6").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(
            db.kv_get("selected_fasting_plan").unwrap().as_deref(),
            Some("18:6")
        );
    }
}
