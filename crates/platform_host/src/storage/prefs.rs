//! Scoped string key-value storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

use super::error::PersistenceError;

/// Host service for durable string values keyed by name (JSON stored as text per key).
///
/// Every `save_pref` replaces the complete value for the key; no interface exposes partial
/// writes.
pub trait PrefsStore {
    /// Loads the raw text stored under `key`.
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replaces the raw text stored under `key`.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: PrefsStore + ?Sized> PrefsStore for Rc<S> {
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).load_pref(key)
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        (**self).save_pref(key, raw_json)
    }

    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).delete_pref(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same backing map, which lets tests keep a handle while a store owns
/// another.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the sorted list of keys currently present.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Store wrapper that namespaces every key as `"{scope}.{key}"`.
pub struct ScopedPrefsStore<S> {
    scope: String,
    inner: S,
}

impl<S: PrefsStore> ScopedPrefsStore<S> {
    /// Wraps `inner` so all keys land under `scope`.
    pub fn new(scope: impl Into<String>, inner: S) -> Self {
        Self {
            scope: scope.into(),
            inner,
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}.{}", self.scope, key)
    }
}

impl<S: PrefsStore> PrefsStore for ScopedPrefsStore<S> {
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.load_pref(&self.scoped_key(key))
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        self.inner.save_pref(&self.scoped_key(key), raw_json)
    }

    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError> {
        self.inner.delete_pref(&self.scoped_key(key))
    }
}

/// Loads and deserializes a typed value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    let value =
        serde_json::from_str(&raw).map_err(|e| PersistenceError::Deserialize(e.to_string()))?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
    store.save_pref(key, &raw)
}
