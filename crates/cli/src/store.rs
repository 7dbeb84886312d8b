//! File-backed key-value store.
//!
//! The whole store is one JSON object mapping keys to base64 encoded values.
//! Every write rewrites the file through a temporary sibling and a rename,
//! so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dough_core::{KeyValueStore, StoreError};
use tracing::debug;

/// A [`KeyValueStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Corrupt`] if it does not hold a valid store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(raw) => decode(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let encoded: BTreeMap<&str, String> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), STANDARD.encode(v)))
            .collect();
        let raw = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = self.entries.len(), "flushed store");
        Ok(())
    }
}

fn decode(raw: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, StoreError> {
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    encoded
        .into_iter()
        .map(|(key, value)| {
            STANDARD
                .decode(value)
                .map(|bytes| (key.clone(), bytes))
                .map_err(|e| StoreError::Corrupt(format!("{key}: {e}")))
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_owned(), value.to_vec());
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let old = self
            .entries
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))?;
        if let Err(e) = self.flush() {
            self.entries.insert(key.to_owned(), old);
            return Err(e);
        }
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dough-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("cart.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = FileStore::open(scratch("missing")).unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_put_persists_across_open() {
        let path = scratch("persist");
        let mut store = FileStore::open(&path).unwrap();
        store.put("user_order_dinner", b"{\"StoreID\":\"4336\"}").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("user_order_dinner").unwrap().as_deref(),
            Some(&b"{\"StoreID\":\"4336\"}"[..])
        );
    }

    #[test]
    fn test_delete_persists() {
        let path = scratch("delete");
        let mut store = FileStore::open(&path).unwrap();
        store.put("a", b"1").unwrap();
        store.put("b", b"2").unwrap();
        store.delete("a").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        let keys: Vec<_> = reopened.get_all().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b"]);
    }

    #[test]
    fn test_delete_missing() {
        let mut store = FileStore::open(scratch("delete-missing")).unwrap();
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt(_))));

        fs::write(&path, br#"{"k": "***"}"#).unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt(_))));
    }
}
