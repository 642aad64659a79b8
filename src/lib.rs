//! # W1NE Core
//!
//! Local-first storage core for the W1NE wine discovery client. Every feature
//! of the client (venue directory, video feed, bookmarks, chat history,
//! session) persists through one asynchronous key-value contract,
//! [`KeyValueStore`], and reads back with prefix scans over colon-delimited
//! keys.
//!
//! ## Features
//!
//! - **Two backends**: [`MemoryStore`] with local-storage semantics and
//!   [`LmdbStore`] for durable on-device storage
//! - **Repositories**: venues partitioned by country, videos, per-user
//!   bookmarks and region-filtered conversations
//! - **Session**: age gate, region and a mocked email sign-in
//! - **AI pass-through**: chat worker and web venue search, with results
//!   written through to the venue directory
//! - **C ABI**: the raw store contract exported for host shells
//!
//! ## Quick Start
//!
//! ```no_run
//! use w1ne_core::context::W1neContext;
//!
//! # async fn run() -> Result<(), w1ne_core::error::StoreError> {
//! let ctx = W1neContext::in_memory();
//! ctx.entities.seed_region_if_empty("CH").await?;
//!
//! let venues = ctx.entities.list_by_country("CH").await?;
//! assert_eq!(venues.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_store`] - Open an LMDB-backed store
//! - [`store_get`] - Read one key
//! - [`store_set`] - Write one key
//! - [`store_delete`] - Delete one key
//! - [`store_list`] - List keys by prefix
//! - [`store_clear`] - Remove every key
//! - [`close_store`] - Release the store
//! - [`free_response`] - Release a string returned by any of the above

pub mod access;
pub mod admin;
pub mod assistant;
pub mod bookmark_repository;
pub mod chat_client;
pub mod clock;
pub mod config;
pub mod context;
pub mod conversation_repository;
pub mod entity_repository;
pub mod error;
pub mod forms;
pub mod keys;
pub mod kv_store;
pub mod lmdb_store;
pub mod memory_store;
pub mod models;
pub mod seed;
pub mod session;
pub mod venue_search;
pub mod video_repository;
mod app_response;

pub use crate::kv_store::{DeleteReceipt, KeyListing, KeyValueStore, StoredValue};
pub use crate::lmdb_store::LmdbStore;
pub use crate::memory_store::MemoryStore;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};

use crate::app_response::AppResponse;

/// Opens (or creates) an LMDB-backed store named `name`.
///
/// The data lives in a `<name>.lmdb` directory relative to the working
/// directory.
///
/// # Returns
///
/// A pointer to the store, or null if the name is null, not UTF-8, or the
/// environment cannot be opened. Release it with [`close_store`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use w1ne_core::{close_store, create_store};
///
/// let name = CString::new("w1ne").unwrap();
/// let store = create_store(name.as_ptr());
/// assert!(!store.is_null());
/// close_store(store);
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store(name: *const c_char) -> *mut LmdbStore {
    if name.is_null() {
        warn!("Null name pointer passed to create_store");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match LmdbStore::init(name_str) {
        Ok(store) => {
            info!("Store {name_str} opened");
            Box::into_raw(Box::new(store))
        }
        Err(e) => {
            warn!("Failed to open store {name_str}: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Reads one key.
///
/// Answers `{"Ok": "{\"key\":..,\"value\":..,\"shared\":false}"}`, or
/// `{"Ok": "null"}` when the key is absent.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn store_get(store: *mut LmdbStore, key: *const c_char) -> *const c_char {
    let store = match store_ref(store, "store_get") {
        Ok(store) => store,
        Err(err) => return err,
    };
    let key = match c_ptr_to_string(key, "key") {
        Ok(key) => key,
        Err(err) => return err,
    };

    respond(store.fetch(&key))
}

/// Writes one key, overwriting any previous value.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use w1ne_core::{create_store, store_set};
///
/// let name = CString::new("w1ne").unwrap();
/// let store = create_store(name.as_ptr());
///
/// let key = CString::new("w1ne_selected_region").unwrap();
/// let value = CString::new("CH").unwrap();
/// let result = store_set(store, key.as_ptr(), value.as_ptr());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn store_set(
    store: *mut LmdbStore,
    key: *const c_char,
    value: *const c_char,
) -> *const c_char {
    let store = match store_ref(store, "store_set") {
        Ok(store) => store,
        Err(err) => return err,
    };
    let key = match c_ptr_to_string(key, "key") {
        Ok(key) => key,
        Err(err) => return err,
    };
    let value = match c_ptr_to_string(value, "value") {
        Ok(value) => value,
        Err(err) => return err,
    };

    respond(store.put(&key, &value))
}

/// Deletes one key. Deleting an absent key succeeds.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn store_delete(store: *mut LmdbStore, key: *const c_char) -> *const c_char {
    let store = match store_ref(store, "store_delete") {
        Ok(store) => store,
        Err(err) => return err,
    };
    let key = match c_ptr_to_string(key, "key") {
        Ok(key) => key,
        Err(err) => return err,
    };

    respond(store.remove(&key))
}

/// Lists every key starting with `prefix`. An empty prefix lists all keys.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn store_list(store: *mut LmdbStore, prefix: *const c_char) -> *const c_char {
    let store = match store_ref(store, "store_list") {
        Ok(store) => store,
        Err(err) => return err,
    };
    let prefix = match c_ptr_to_string(prefix, "prefix") {
        Ok(prefix) => prefix,
        Err(err) => return err,
    };

    respond(store.keys_with_prefix(&prefix))
}

/// Removes every key; the payload is the number removed.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn store_clear(store: *mut LmdbStore) -> *const c_char {
    let store = match store_ref(store, "store_clear") {
        Ok(store) => store,
        Err(err) => return err,
    };

    respond(store.clear_all_records())
}

/// Releases a store returned by [`create_store`]. Null is ignored.
///
/// # Safety
///
/// `store` must come from [`create_store`] and must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_store(store: *mut LmdbStore) {
    if store.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(store) });
    info!("Store closed");
}

/// Releases a response string returned by any `store_*` function.
///
/// # Safety
///
/// `response` must come from this library and must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(response: *const c_char) {
    if response.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(response as *mut c_char) });
}

fn store_ref<'a>(store: *mut LmdbStore, caller: &str) -> Result<&'a LmdbStore, *const c_char> {
    match unsafe { store.as_ref() } {
        Some(store) => Ok(store),
        None => {
            let error = AppResponse::BadRequest(format!("Null store pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, error::StoreError>) -> *const c_char {
    let response = match result {
        Ok(payload) => AppResponse::success(&payload),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

/// Serializes `response` into a C string owned by the caller.
///
/// Returns null if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String.
///
/// Null pointers and invalid UTF-8 come back as a ready-made `BadRequest`
/// response naming `field_name`.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
