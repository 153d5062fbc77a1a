//! SQLite key/value backend.
//!
//! # Responsibility
//! - Open the study database and make sure `kv_store` exists.
//! - Persist the course snapshot as one JSON value under `STORAGE_KEY`.
//!
//! # Invariants
//! - A constructed `SqliteStore` always has the `kv_store` table.
//! - Each write is a single upsert; readers never observe a partial snapshot.

use crate::model::course::Course;
use crate::store::codec::{decode_courses, encode_courses};
use crate::store::{CourseStore, StoreError, StoreResult, STORAGE_KEY};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const KV_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// SQLite-backed course store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Side effects
    /// - Creates the file and the `kv_store` table when missing.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        open_with("file", || Connection::open(path))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Wraps an existing connection, creating `kv_store` if it is absent.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(KV_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn open_with(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<SqliteStore> {
    let started_at = Instant::now();
    info!("event=db_open module=store status=start mode={mode}");

    let result = open()
        .map_err(StoreError::from)
        .and_then(SqliteStore::from_connection);
    match &result {
        Ok(_) => info!(
            "event=db_open module=store status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=store status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

impl CourseStore for SqliteStore {
    fn read(&self) -> StoreResult<Vec<Course>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => decode_courses(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, courses: &[Course]) -> StoreResult<()> {
        let encoded = encode_courses(courses)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![STORAGE_KEY, encoded],
        )?;
        debug!(
            "event=store_write module=store status=ok backend=sqlite bytes={}",
            encoded.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::store::{CourseStore, STORAGE_KEY};
    use rusqlite::Connection;

    fn kv_table_exists(conn: &Connection) -> bool {
        conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn bare_connection_gets_kv_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!kv_table_exists(&conn));

        let store = SqliteStore::from_connection(conn).unwrap();
        assert!(kv_table_exists(store.connection()));
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn existing_value_survives_schema_setup() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE kv_store (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL, updated_at INTEGER NOT NULL DEFAULT 0);")
            .unwrap();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, '[]');",
            [STORAGE_KEY],
        )
        .unwrap();

        let store = SqliteStore::from_connection(conn).unwrap();
        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn reopening_file_database_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.sqlite3");

        drop(SqliteStore::open(&path).unwrap());
        let store = SqliteStore::open(&path).unwrap();
        assert!(kv_table_exists(store.connection()));
    }

    #[test]
    fn unopenable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("study.sqlite3");
        assert!(SqliteStore::open(&path).is_err());
    }
}
