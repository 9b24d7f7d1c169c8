//! Key-value persistence media.
//!
//! The store only needs scoped `get`/`set`/`remove` of string blobs. A browser
//! session store, a file, or a cache server can sit behind [`Storage`];
//! [`MemoryStorage`] is the in-process implementation.

use hashbrown::HashMap;
use parking_lot::RwLock;

/// Error type for storage media.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The medium cannot be used at all (disabled, private mode, not mounted).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the medium's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        /// Bytes the medium would hold after the write.
        needed: usize,
        /// Bytes the medium allows.
        limit: usize,
    },

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A scoped key-value medium holding string blobs.
pub trait Storage: Send + Sync {
    /// Reads a blob. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a blob, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a blob. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, optionally bounded by a byte quota.
///
/// The quota counts key and value bytes of every stored entry.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates an unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that rejects writes beyond `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(bytes),
        }
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns all stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drops every stored entry, as a browser does when a session ends.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(key, value)| key.len() + value.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        if let Some(limit) = self.quota {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = Self::used_bytes(&entries) - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.len(), 1);

        storage.remove("k").unwrap();
        assert!(storage.is_empty());
        storage.remove("k").unwrap();
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("k", "1234").unwrap();

        let err = storage.set("other", "123456").unwrap_err();
        assert_eq!(
            err,
            StorageError::QuotaExceeded {
                needed: 16,
                limit: 8
            }
        );
        assert_eq!(storage.keys(), vec!["k".to_string()]);
    }

    #[test]
    fn quota_accounts_for_replaced_value() {
        let storage = MemoryStorage::with_quota(6);
        storage.set("k", "12345").unwrap();
        storage.set("k", "54321").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("54321"));
    }

    #[test]
    fn error_display() {
        let err = StorageError::Unavailable("disabled".into());
        assert_eq!(err.to_string(), "storage unavailable: disabled");
    }
}
