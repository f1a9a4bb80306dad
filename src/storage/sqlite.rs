use crate::errors::Result;
use crate::storage::Storage;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Contains the SQL queries used to interact with the database
pub mod sql_queries {
    pub const CREATE_TABLE: &str =
        "CREATE TABLE IF NOT EXISTS local_storage (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)";

    pub const SELECT_ITEM: &str = "SELECT value FROM local_storage WHERE key = ?1";
    pub const UPSERT_ITEM: &str = "INSERT INTO local_storage (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value";
    pub const DELETE_ITEM: &str = "DELETE FROM local_storage WHERE key = ?1";
    pub const SELECT_KEYS: &str = "SELECT key FROM local_storage ORDER BY key";
}

/// Local storage kept in a SQLite file, so the session survives between runs
pub struct SqliteStorage {
    /// rusqlite connections are not `Sync`, every access goes through the lock
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (and create if needed) the storage file, along with its parent directory
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Storage that disappears with the object
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(sql_queries::CREATE_TABLE, [])?;
        Ok(SqliteStorage {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn()
            .query_row(sql_queries::SELECT_ITEM, params![key], |row| row.get(0))
            .optional()?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn()
            .execute(sql_queries::UPSERT_ITEM, params![key, value])?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.conn().execute(sql_queries::DELETE_ITEM, params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql_queries::SELECT_KEYS)?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sqlite_storage() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);

        storage.set_item("token", "abc").unwrap();
        storage.set_item("userData", "{\"email\":\"a@b.c\"}").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

        storage.set_item("token", "def").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("def"));
        assert_eq!(storage.keys().unwrap(), vec!["token", "userData"]);

        storage.remove_item("token").unwrap();
        storage.remove_item("missing").unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
        assert_eq!(storage.keys().unwrap(), vec!["userData"]);
    }

    #[test]
    fn test_sqlite_storage_persists() {
        let dir = std::env::temp_dir().join(format!(
            "nowaste-storage-test-{}-{}",
            std::process::id(),
            rand::random::<u32>()
        ));
        let path = dir.join("session.sqlite3");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.set_item("userType", "restaurant").unwrap();
        }
        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            storage.get_item("userType").unwrap().as_deref(),
            Some("restaurant")
        );

        drop(storage);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
