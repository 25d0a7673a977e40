//! Record registries for the staffing domain.
//!
//! Each registry (employees, clients, contracts, certificates) is one logical
//! namespace over the shared backing map. Records are serde structs stored as
//! opaque JSON under a ULID key; cross-registry links are plain ID strings
//! checked at insertion time, not enforced by the store.

pub mod certificate;
pub mod client;
pub mod contract;
pub mod employee;

use crate::core::backing::BackingMap;
use crate::core::error;
use crate::core::store::{Store, StoreOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Open the registry namespace `name` over the shared backing map.
pub fn open_registry(
    backing: &Arc<dyn BackingMap>,
    name: &str,
) -> Result<Store, error::InterimError> {
    Store::open(
        Arc::clone(backing),
        StoreOptions {
            name: Some(name.to_string()),
            ..Default::default()
        },
    )
}

pub(crate) fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

/// Serialize `record` into the registry. A refused facade write surfaces as an
/// error at this layer so CLI callers get a real diagnostic.
pub(crate) fn put_record<T: Serialize>(
    store: &Store,
    id: &str,
    record: &T,
) -> Result<(), error::InterimError> {
    let value = serde_json::to_value(record)?;
    if !store.set(id, Some(value)) {
        return Err(error::InterimError::WriteRefused(format!(
            "{}/{}",
            store.name(),
            id
        )));
    }
    Ok(())
}

pub(crate) fn fetch_record<T: DeserializeOwned>(
    store: &Store,
    id: &str,
) -> Result<Option<T>, error::InterimError> {
    match store.get(id) {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Every parseable record of the registry, sorted by ID (ULIDs sort by
/// creation time). Entries that no longer match the record shape are skipped
/// with a diagnostic rather than failing the listing.
pub(crate) fn list_records<T: DeserializeOwned>(store: &Store) -> Vec<T> {
    let mut out = Vec::new();
    for (id, value) in store.entries() {
        match serde_json::from_value(value) {
            Ok(record) => out.push(record),
            Err(e) => {
                warn!(namespace = %store.name(), id = %id, error = %e, "skipping malformed record");
            }
        }
    }
    out
}

pub(crate) fn remove_record(store: &Store, id: &str) -> Result<(), error::InterimError> {
    if !store.has(id) {
        return Err(error::InterimError::NotFound(format!(
            "{} record '{}'",
            store.name(),
            id
        )));
    }
    store.delete(id);
    Ok(())
}
