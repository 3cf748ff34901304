//! `localStorage`-backed key-value store implementation.
//!
//! `localStorage` is synchronous and replaces a key's value in one `setItem` call, which gives
//! the all-or-nothing write guarantee [`platform_host::PrefsStore`] promises.

use platform_host::{PersistenceError, PrefsStore};

#[derive(Debug, Clone, Copy, Default)]
/// Browser key-value store backed by `window.localStorage`.
pub struct WebPrefsStore;

impl WebPrefsStore {
    /// Loads the raw JSON string for a key.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the read fails.
    pub fn load_json(self, key: &str) -> Result<Option<String>, PersistenceError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            storage
                .get_item(key)
                .map_err(|e| map_storage_error("get_item", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    /// Saves the raw JSON string for a key.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable, the quota is exhausted, or the write
    /// fails.
    pub fn save_json(self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            storage
                .set_item(key, raw_json)
                .map_err(|e| map_storage_error("set_item", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    /// Deletes a key from localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn delete_json(self, key: &str) -> Result<(), PersistenceError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            storage
                .remove_item(key)
                .map_err(|e| map_storage_error("remove_item", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

impl PrefsStore for WebPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.load_json(key)
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), PersistenceError> {
        self.save_json(key, raw_json)
    }

    fn delete_pref(&self, key: &str) -> Result<(), PersistenceError> {
        self.delete_json(key)
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PersistenceError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(PersistenceError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
fn map_storage_error(op: &str, err: wasm_bindgen::JsValue) -> PersistenceError {
    use wasm_bindgen::JsCast;

    match err.dyn_ref::<web_sys::DomException>() {
        Some(dom) if dom.name() == "QuotaExceededError" => PersistenceError::QuotaExceeded,
        _ => PersistenceError::Backend(format!("localStorage {op} failed: {err:?}")),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_build_is_inert_and_successful() {
        let store = WebPrefsStore;
        store.save_json("cart", "{}").expect("save");
        assert_eq!(store.load_json("cart").expect("load"), None);
        store.delete_json("cart").expect("delete");
    }
}
