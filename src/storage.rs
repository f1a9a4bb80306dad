pub mod sqlite;
pub use sqlite::SqliteStorage;

use crate::errors::Result;

/// Trait hiding where the client keeps its local key-value data
///
/// This plays the part of a browser's local storage: string keys, string
/// values, no schema. I like to have a mock for unit tests, the SQLite one is
/// what the binary uses.
pub trait Storage: Send + Sync {
    /// Value stored under `key`, `None` if absent
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Every key currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStorage(Mutex<BTreeMap<String, String>>);

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Storage pre-filled with the given pairs
        pub fn with_items(items: &[(&str, &str)]) -> Self {
            let map = items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            MemoryStorage(Mutex::new(map))
        }

        fn map(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
            // A poisoned map is still a valid map
            self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl Storage for MemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            Ok(self.map().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.map().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.map().remove(key);
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>> {
            Ok(self.map().keys().cloned().collect())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_memory_storage() {
            let storage = MemoryStorage::new();
            assert_eq!(storage.get_item("token").unwrap(), None);

            storage.set_item("token", "abc").unwrap();
            storage.set_item("userType", "charity").unwrap();
            assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

            storage.set_item("token", "def").unwrap();
            assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("def"));
            assert_eq!(storage.keys().unwrap(), vec!["token", "userType"]);

            storage.remove_item("token").unwrap();
            storage.remove_item("token").unwrap();
            assert_eq!(storage.keys().unwrap(), vec!["userType"]);
        }
    }
}
