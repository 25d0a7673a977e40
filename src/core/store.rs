//! Namespaced key-value store facade.
//!
//! A [`Store`] is a logical namespace over one shared flat backing map. Every
//! entry the store manages lives at `prefix + logical_key`, where the prefix is
//! derived from the namespace name and an optional working-directory qualifier.
//! Values are opaque JSON.
//!
//! Once a store is open, every method is total: failures of the backing map or
//! of serialization are logged and converted into a benign return value
//! (`None`, `false`, or a no-op `true`). Callers treat absence of data as
//! "not yet set"; they never see an error.

use crate::core::backing::BackingMap;
use crate::core::error;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

/// Namespace used when no name is given.
pub const DEFAULT_STORE_NAME: &str = "config";

/// Separator between the namespace qualifiers and the logical key. Reserved:
/// names and working directories containing it are rejected at construction,
/// which keeps full-prefix matching in `clear`/`entries` collision-free.
pub const NAMESPACE_SEPARATOR: char = '_';

/// Construction options for [`Store::open`].
#[derive(Debug, Default, Clone)]
pub struct StoreOptions {
    /// Logical namespace identifier. Defaults to [`DEFAULT_STORE_NAME`].
    pub name: Option<String>,
    /// Working-directory discriminator prefixed before the name. Empty by default.
    pub cwd: Option<String>,
    /// Accepted for call-site compatibility with schema-validating variants;
    /// values are stored as opaque JSON and never validated here.
    pub schema: Option<Value>,
}

/// One logical namespace over the shared backing map.
pub struct Store {
    name: String,
    prefix: String,
    backing: Arc<dyn BackingMap>,
}

fn validate_qualifier(what: &str, value: &str) -> Result<(), error::InterimError> {
    if value.is_empty() {
        return Err(error::InterimError::ValidationError(format!(
            "store {} must not be empty",
            what
        )));
    }
    if value.contains(NAMESPACE_SEPARATOR) {
        return Err(error::InterimError::ValidationError(format!(
            "store {} '{}' must not contain '{}'",
            what, value, NAMESPACE_SEPARATOR
        )));
    }
    Ok(())
}

impl Store {
    /// Open a namespace over `backing`.
    ///
    /// Construction is the only fallible step of a store's life: the name and
    /// working directory are checked against the reserved separator here so
    /// that no two stores can ever shadow each other's prefix.
    pub fn open(
        backing: Arc<dyn BackingMap>,
        options: StoreOptions,
    ) -> Result<Self, error::InterimError> {
        let name = options
            .name
            .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string());
        validate_qualifier("name", &name)?;

        let prefix = match options.cwd.as_deref() {
            Some(cwd) if !cwd.is_empty() => {
                validate_qualifier("working directory", cwd)?;
                format!("{cwd}{NAMESPACE_SEPARATOR}{name}{NAMESPACE_SEPARATOR}")
            }
            _ => format!("{name}{NAMESPACE_SEPARATOR}"),
        };

        Ok(Self {
            name,
            prefix,
            backing,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full physical prefix, including the trailing separator.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn physical_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Deserialized value stored at `key`, or `None` when the entry is absent
    /// or its raw value is not valid JSON (logged, not raised).
    pub fn get(&self, key: &str) -> Option<Value> {
        let physical = self.physical_key(key);
        let raw = match self.backing.read(&physical) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(namespace = %self.name, key, error = %e, "read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(namespace = %self.name, key, error = %e, "stored value is not valid JSON");
                None
            }
        }
    }

    /// Every entry of this namespace, logical key to value, prefix stripped.
    ///
    /// The scan is best-effort: an entry whose raw value does not parse as JSON
    /// is returned as a plain string rather than failing the whole scan. An
    /// empty namespace yields an empty map.
    pub fn entries(&self) -> Map<String, Value> {
        let mut out = Map::new();
        let keys = match self.backing.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.name, error = %e, "namespace scan failed");
                return out;
            }
        };
        for physical in keys {
            let Some(logical) = physical.strip_prefix(&self.prefix) else {
                continue;
            };
            match self.backing.read(&physical) {
                Ok(Some(raw)) => {
                    let value = serde_json::from_str(&raw)
                        .unwrap_or_else(|_| Value::String(raw));
                    out.insert(logical.to_string(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(namespace = %self.name, key = logical, error = %e, "read failed during scan");
                }
            }
        }
        out
    }

    /// Write `value` at `key`, or delete the entry when `value` is `None`.
    ///
    /// Returns `false` (with a diagnostic log line) on any serialization or
    /// backing-map failure; the error never reaches the caller.
    pub fn set(&self, key: &str, value: Option<Value>) -> bool {
        let Some(value) = value else {
            return self.delete(key);
        };
        let raw = match serde_json::to_string(&value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(namespace = %self.name, key, error = %e, "serialization failed");
                return false;
            }
        };
        match self.backing.write(&self.physical_key(key), &raw) {
            Ok(()) => true,
            Err(e) => {
                warn!(namespace = %self.name, key, error = %e, "write failed");
                false
            }
        }
    }

    /// Physical existence of `key` in this namespace, regardless of the
    /// truthiness of the stored value.
    pub fn has(&self, key: &str) -> bool {
        match self.backing.contains(&self.physical_key(key)) {
            Ok(found) => found,
            Err(e) => {
                warn!(namespace = %self.name, key, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Remove `key` if present. Idempotent: deleting an absent key is fine,
    /// and the return value is always `true`.
    pub fn delete(&self, key: &str) -> bool {
        if let Err(e) = self.backing.remove(&self.physical_key(key)) {
            warn!(namespace = %self.name, key, error = %e, "delete failed");
        }
        true
    }

    /// Remove every entry of this namespace. Entries under any other prefix
    /// are untouched: matching anchors on the full prefix, trailing separator
    /// included. Always returns `true`.
    pub fn clear(&self) -> bool {
        let keys = match self.backing.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.name, error = %e, "namespace scan failed during clear");
                return true;
            }
        };
        for physical in keys {
            if !physical.starts_with(&self.prefix) {
                continue;
            }
            if let Err(e) = self.backing.remove(&physical) {
                warn!(namespace = %self.name, key = %physical, error = %e, "remove failed during clear");
            }
        }
        true
    }

    /// Clear the namespace, then write every key of `new_data`.
    ///
    /// Atomic in intent only: the clear-then-rewrite sequence is two passes
    /// over the backing map, and a concurrent reader on the same prefix may
    /// observe the namespace partially cleared. Non-object input is a no-op
    /// that still returns `true`.
    pub fn replace_all(&self, new_data: Value) -> bool {
        let Value::Object(entries) = new_data else {
            warn!(namespace = %self.name, "replace_all called with non-object input; ignoring");
            return true;
        };
        self.clear();
        for (key, value) in entries {
            self.set(&key, Some(value));
        }
        true
    }

    /// Sum of the character counts of all raw stored values in this namespace.
    /// An approximation of footprint, not a multi-byte-encoded size.
    pub fn size_bytes(&self) -> u64 {
        let keys = match self.backing.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.name, error = %e, "namespace scan failed during size check");
                return 0;
            }
        };
        let mut total: u64 = 0;
        for physical in keys {
            if !physical.starts_with(&self.prefix) {
                continue;
            }
            if let Ok(Some(raw)) = self.backing.read(&physical) {
                total += raw.chars().count() as u64;
            }
        }
        total
    }

    /// Schema-evolution hook. Values are stored as opaque JSON with no
    /// versioned schema, so there is nothing to migrate; always `true`.
    pub fn migrate(&self) -> bool {
        true
    }
}

/// Install the host bridge in the privileged-host operating mode.
///
/// In the in-process mode this binary runs in, the backing map is reached
/// directly and there is no privileged host to bridge to, so this is an
/// idempotent no-op kept for call-site compatibility. Never fails.
pub fn init_global_bridge() -> bool {
    true
}
