//! Key-value storage used to persist cart orders.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors from a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key does not exist.
    #[error("no value stored under {0}")]
    NotFound(String),

    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing storage holds data that cannot be read back.
    #[error("storage is corrupt: {0}")]
    Corrupt(String),
}

/// Flat key-value storage over string keys and byte values.
///
/// Single-key operations are expected to be atomic; nothing here needs
/// multi-key transactions.
pub trait KeyValueStore {
    /// Fetch a value, `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a value, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key is absent.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every key and value, in the store's iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}

/// In-memory store, iterating keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
