//! In-process store with local-storage semantics.
//!
//! Keys enumerate in first-insertion order. Overwriting a key keeps its
//! position, deleting it drops it. Nothing survives the process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::kv_store::{DeleteReceipt, KeyListing, KeyValueStore, StoredValue};

#[derive(Default)]
struct Entries {
    order: Vec<String>,
    values: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
    shared: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shared(shared: bool) -> Self {
        Self {
            entries: RwLock::default(),
            shared,
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|entries| entries.order.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, StoreError> {
        self.entries
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        let entries = self.read()?;
        Ok(entries.values.get(key).map(|value| StoredValue {
            key: key.to_string(),
            value: value.clone(),
            shared: self.shared,
        }))
    }

    async fn set(&self, key: &str, value: &str) -> Result<StoredValue, StoreError> {
        let mut entries = self.write()?;
        if entries
            .values
            .insert(key.to_string(), value.to_string())
            .is_none()
        {
            entries.order.push(key.to_string());
        }

        Ok(StoredValue {
            key: key.to_string(),
            value: value.to_string(),
            shared: self.shared,
        })
    }

    async fn delete(&self, key: &str) -> Result<DeleteReceipt, StoreError> {
        let mut entries = self.write()?;
        if entries.values.remove(key).is_some() {
            entries.order.retain(|k| k != key);
        }

        Ok(DeleteReceipt {
            key: key.to_string(),
            deleted: true,
            shared: self.shared,
        })
    }

    async fn list(&self, prefix: &str) -> Result<KeyListing, StoreError> {
        let entries = self.read()?;
        let keys = entries
            .order
            .iter()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        Ok(KeyListing {
            keys,
            prefix: prefix.to_string(),
            shared: self.shared,
        })
    }
}
