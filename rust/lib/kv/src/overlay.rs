use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// OverlayKV is a two-layer KV store:
///
/// - **File layer** (read-only, higher priority): pinned configuration
///   loaded from the data directory, e.g. the equipment catalog.
/// - **DB layer** (read-write): the plate set, logs, usage overrides and
///   admin secret, backed by a concrete KVStore (e.g. redb).
///
/// Reads check the file layer first. Writes to a key that exists in the
/// file layer fail with `KVError::ReadOnly`; batches are checked in full
/// before anything reaches the DB layer.
pub struct OverlayKV<DB: KVStore> {
    file_layer: RwLock<BTreeMap<String, Vec<u8>>>,
    db: DB,
}

impl<DB: KVStore> OverlayKV<DB> {
    /// Create a new OverlayKV with an empty file layer and the given DB backend.
    pub fn new(db: DB) -> Self {
        Self {
            file_layer: RwLock::new(BTreeMap::new()),
            db,
        }
    }

    /// Insert a key-value pair into the read-only file layer.
    /// Called by FileLoader during initialization.
    pub fn insert_file_entry(&self, key: String, value: Vec<u8>) {
        self.file_layer.write().unwrap().insert(key, value);
    }

    /// Number of entries in the file layer.
    pub fn file_layer_len(&self) -> usize {
        self.file_layer.read().unwrap().len()
    }

    fn ensure_writable<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> Result<(), KVError> {
        let layer = self.file_layer.read().unwrap();
        for key in keys {
            if layer.contains_key(key) {
                return Err(KVError::ReadOnly(key.to_string()));
            }
        }
        Ok(())
    }
}

impl<DB: KVStore> KVStore for OverlayKV<DB> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        if let Some(value) = self.file_layer.read().unwrap().get(key) {
            return Ok(Some(value.clone()));
        }
        self.db.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.ensure_writable([key])?;
        self.db.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.ensure_writable([key])?;
        self.db.delete(key)
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.ensure_writable(entries.iter().map(|(k, _)| *k))?;
        self.db.batch_set(entries)
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.ensure_writable(keys.iter().copied())?;
        self.db.batch_delete(keys)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        // DB entries first, then file entries overwrite on duplicate keys.
        let mut merged: BTreeMap<String, Vec<u8>> = self.db.scan(prefix)?.into_iter().collect();

        let layer = self.file_layer.read().unwrap();
        for (key, value) in layer.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            merged.insert(key.clone(), value.clone());
        }

        Ok(merged.into_iter().collect())
    }

    fn is_readonly(&self, key: &str) -> bool {
        self.file_layer.read().unwrap().contains_key(key)
    }
}
