//! Browser storage backend for the session store.
//!
//! `Scope::Tab` maps to `sessionStorage`, `Scope::Browser` to
//! `localStorage`. Values are stored as raw strings. Storage that is
//! disabled or throws surfaces as `StorageError` instead of a JS exception.

use cryptohub_session::storage::{KeyValueStore, Scope, StorageError};
use gloo_storage::{LocalStorage, SessionStorage, Storage};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

fn js_reason(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

impl BrowserStore {
    /// The raw `web_sys::Storage` for a scope, if the browser exposes it.
    fn area(scope: Scope) -> Result<web_sys::Storage, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        // Probe first: gloo's `raw()` throws when storage is blocked.
        let available = match scope {
            Scope::Tab => window.session_storage(),
            Scope::Browser => window.local_storage(),
        };
        match available {
            Ok(Some(_)) => Ok(match scope {
                Scope::Tab => SessionStorage::raw(),
                Scope::Browser => LocalStorage::raw(),
            }),
            Ok(None) => Err(StorageError::Unavailable(format!("{scope:?} storage disabled"))),
            Err(e) => Err(StorageError::Unavailable(js_reason(&e))),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        Self::area(scope)?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_reason(&e)))
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        Self::area(scope)?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError> {
        Self::area(scope)?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }
}
