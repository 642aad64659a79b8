//! Persistent [`KeyValueStore`] backed by LMDB.
//!
//! The database lives in a `<name>.lmdb` directory holding a single named
//! database. Reads and writes are synchronous; the async trait methods simply
//! call through, the same way browser local storage backs the async façade.
//! Keys enumerate in LMDB byte order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lmdb::{Cursor, Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::error::StoreError;
use crate::kv_store::{DeleteReceipt, KeyListing, KeyValueStore, StoredValue};

/// Large enough for data-URI video uploads; the file is sparse until used.
const MAP_SIZE: usize = 1 << 30;
const DB_NAME: &str = "w1ne";

pub struct LmdbStore {
    env: Environment,
    db: Database,
    path: PathBuf,
    shared: bool,
}

impl LmdbStore {
    /// Opens (or creates) `<name>.lmdb` relative to the working directory.
    pub fn init(name: &str) -> Result<Self, StoreError> {
        Self::open(Path::new(&format!("{name}.lmdb")))
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path).map_err(|e| {
            StoreError::Database(format!("Cannot create {}: {e}", path.display()))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(MAP_SIZE)
            .open(path)?;
        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("LMDB store opened at {}", path.display());

        Ok(Self {
            env,
            db,
            path: path.to_path_buf(),
            shared: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fetch(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| StoreError::Database(format!("Value at {key} is not UTF-8: {e}")))?,
            Err(lmdb::Error::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(StoredValue {
            key: key.to_string(),
            value,
            shared: self.shared,
        }))
    }

    pub fn put(&self, key: &str, value: &str) -> Result<StoredValue, StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;

        Ok(StoredValue {
            key: key.to_string(),
            value: value.to_string(),
            shared: self.shared,
        })
    }

    pub fn remove(&self, key: &str) -> Result<DeleteReceipt, StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {}
            Err(lmdb::Error::NotFound) => debug!("Delete of absent key {key}"),
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;

        Ok(DeleteReceipt {
            key: key.to_string(),
            deleted: true,
            shared: self.shared,
        })
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Result<KeyListing, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let mut keys = Vec::new();
        {
            let mut cursor = txn.open_ro_cursor(self.db)?;
            // Unpositioned MDB_NEXT; the seeking iterators panic on an empty range.
            let prefix_bytes = prefix.as_bytes();
            keys.extend(
                cursor
                    .iter()
                    .map(|(key, _)| key)
                    .skip_while(|key| *key < prefix_bytes)
                    .take_while(|key| key.starts_with(prefix_bytes))
                    .map(|key| String::from_utf8_lossy(key).into_owned()),
            );
        }

        Ok(KeyListing {
            keys,
            prefix: prefix.to_string(),
            shared: self.shared,
        })
    }

    /// Removes every key and returns how many there were.
    pub fn clear_all_records(&self) -> Result<usize, StoreError> {
        let listing = self.keys_with_prefix("")?;
        let mut txn = self.env.begin_rw_txn()?;
        for key in &listing.keys {
            txn.del(self.db, key, None)?;
        }
        txn.commit()?;

        info!("Cleared {} records from {}", listing.keys.len(), self.path.display());
        Ok(listing.keys.len())
    }
}

#[async_trait]
impl KeyValueStore for LmdbStore {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        self.fetch(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<StoredValue, StoreError> {
        self.put(key, value)
    }

    async fn delete(&self, key: &str) -> Result<DeleteReceipt, StoreError> {
        self.remove(key)
    }

    async fn list(&self, prefix: &str) -> Result<KeyListing, StoreError> {
        self.keys_with_prefix(prefix)
    }
}
