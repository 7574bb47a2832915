//! Helpers shared by the storage-backed tests

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use super::connection::{create_pool, get_connection, DbPool};
use super::setup;

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Fresh in-memory database with the schema applied
pub fn memory_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    setup::ensure_schema(&conn).unwrap();
    conn
}

/// Database file that is removed, with its journal, when dropped
pub struct TempDb {
    pool: DbPool,
    path: PathBuf,
}

impl TempDb {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

/// Pool over a fresh database file, so several connections see the same data
pub fn file_pool() -> TempDb {
    let path = unique_db_path();
    let _ = std::fs::remove_file(&path);

    let pool = create_pool(path.to_str().unwrap()).unwrap();
    let conn = get_connection(&pool).unwrap();
    setup::ensure_schema(&conn).unwrap();
    TempDb { pool, path }
}

fn unique_db_path() -> PathBuf {
    let n = NEXT_DB.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "pronostics_test_{}_{}.db",
        std::process::id(),
        n
    ))
}

/// June 2026 timestamp
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_db_file_is_removed_on_drop() {
        let db = file_pool();
        let path = db.path.clone();
        get_connection(&db.pool())
            .unwrap()
            .execute("INSERT INTO users (username) VALUES ('ghost')", [])
            .unwrap();
        assert!(path.exists());

        drop(db);

        assert!(!path.exists());
    }
}
