//! The key-value storage contract every feature persists through.
//!
//! Keys are colon-delimited strings forming a prefix hierarchy
//! (`entity:CH:<id>`, `video:<id>`, ...) and values are flat strings; callers
//! serialize structured data to JSON before writing. The store is the only
//! persistence primitive, and a prefix scan is the only index.
//!
//! # Guarantees
//!
//! - `get` on a missing key answers `Ok(None)`.
//! - `set` overwrites unconditionally; a following `get` observes the write.
//! - `delete` is idempotent and always reports `deleted: true`.
//! - `list` returns every key starting with the prefix, in whatever order the
//!   backend enumerates. Callers that need an order sort the decoded records.
//!
//! Nothing here is atomic across calls. Two writers to one key resolve as
//! last-write-wins, and a key listed by `list` may be gone by the time it is
//! fetched; [`load_prefix`] skips such keys.

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A value as returned by `get` and `set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    pub key: String,
    pub value: String,
    /// Provenance flag reserved for a multi-device backend. Always threaded
    /// through unchanged; carries no behavior.
    pub shared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub key: String,
    pub deleted: bool,
    pub shared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyListing {
    pub keys: Vec<String>,
    pub prefix: String,
    pub shared: bool,
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<StoredValue, StoreError>;
    async fn delete(&self, key: &str) -> Result<DeleteReceipt, StoreError>;
    async fn list(&self, prefix: &str) -> Result<KeyListing, StoreError>;
}

/// Lists `prefix`, fetches every key and decodes it as `T`.
///
/// Keys that disappear between the listing and the fetch are skipped, as are
/// values that do not decode; neither aborts the scan.
pub async fn load_prefix<T>(store: &dyn KeyValueStore, prefix: &str) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    let listing = store.list(prefix).await?;
    let mut records = Vec::with_capacity(listing.keys.len());

    for key in &listing.keys {
        let Some(stored) = store.get(key).await? else {
            debug!("Key {key} vanished during scan of {prefix}");
            continue;
        };

        match serde_json::from_str::<T>(&stored.value) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping undecodable record at {key}: {e}"),
        }
    }

    Ok(records)
}

/// Fetches and decodes a single record. A value that fails to decode is an
/// error here, unlike in [`load_prefix`].
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(stored) => Ok(Some(serde_json::from_str(&stored.value)?)),
        None => Ok(None),
    }
}

pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, record: &T) -> Result<(), StoreError>
where
    T: Serialize + Sync,
{
    let json = serde_json::to_string(record)?;
    store.set(key, &json).await?;
    Ok(())
}
