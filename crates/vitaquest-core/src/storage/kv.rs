//! String-keyed, string-valued persistent backend.
//!
//! The store has no schema awareness: every value is an opaque string,
//! JSON-encoded (or a stringified primitive) by the caller. The SQLite
//! implementation keeps everything in a single `kv` table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::error::StorageError;

/// Fixed keys of the persisted state contract.
///
/// The exact strings are load-bearing: they name the records existing
/// installations already have on disk.
pub mod keys {
    pub const PLANS: &str = "plans";
    pub const TAKEN_DATES: &str = "takenDates";
    pub const MY_GOALS: &str = "myGoals";
    pub const ACTIVE_GOALS: &str = "activeGoals";
    pub const FINISHED_GOALS: &str = "finishedGoals";
    pub const HAS_COMPLETED_ONBOARDING: &str = "hasCompletedOnboarding";
    pub const ONBOARDING_STEP: &str = "onBoardingStep";
    pub const MY_XP: &str = "myXP";
    pub const MY_LEVEL: &str = "myLevel";
    pub const DAILY_NUTRITION_SUMMARY: &str = "dailyNutritionSummary";
    pub const TIP_VIEWS: &str = "tipViews";

    /// Every key the snapshot loader reads at startup.
    pub const ALL: &[&str] = &[
        PLANS,
        TAKEN_DATES,
        MY_GOALS,
        ACTIVE_GOALS,
        FINISHED_GOALS,
        HAS_COMPLETED_ONBOARDING,
        ONBOARDING_STEP,
        MY_XP,
        MY_LEVEL,
        DAILY_NUTRITION_SUMMARY,
        TIP_VIEWS,
    ];
}

/// Asynchronous key-value persistence backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every stored key. Used only by reset flows and tests.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// SQLite-backed store over a single `kv(key, value)` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `~/.config/vitaquest/vitaquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = super::data_dir().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::open_at(dir.join("vitaquest.db"))
    }

    /// Open the store at an explicit path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests and ephemeral runs).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.lock().unwrap().execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.lock().unwrap().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.conn.lock().unwrap().execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.map.lock().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_kv_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get("missing").await.unwrap().is_none());
        store.set("myXP", "600").await.unwrap();
        assert_eq!(store.get("myXP").await.unwrap().as_deref(), Some("600"));
        store.set("myXP", "700").await.unwrap();
        assert_eq!(store.get("myXP").await.unwrap().as_deref(), Some("700"));
    }

    #[tokio::test]
    async fn sqlite_clear_removes_everything() {
        let store = SqliteStore::open_memory().unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");
        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.set("myLevel", "3").await.unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.get("myLevel").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("plans", "{}").await.unwrap();
        assert_eq!(store.get("plans").await.unwrap().as_deref(), Some("{}"));
        store.clear().await.unwrap();
        assert!(store.get("plans").await.unwrap().is_none());
    }

    #[test]
    fn all_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for key in keys::ALL {
            assert!(seen.insert(*key), "duplicate key {key}");
        }
        assert_eq!(keys::ALL.len(), 11);
    }
}
