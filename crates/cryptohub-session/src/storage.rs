//! Key/value persistence scopes backing the session store.
//!
//! The browser offers two scopes: tab-scoped `sessionStorage` and
//! browser-scoped `localStorage`. The web crate maps both onto
//! `KeyValueStore`; [`MemoryStore`] is the host-side equivalent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

// ── Scopes ──────────────────────────────────────────────────────────

/// Lifetime of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Cleared when the tab closes (`sessionStorage`).
    Tab,
    /// Survives across tabs and restarts (`localStorage`).
    Browser,
}

/// Raw string storage split into [`Scope`]s.
pub trait KeyValueStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError>;
}

// ── In-memory store ─────────────────────────────────────────────────

/// In-memory store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<(Scope, String), String>>>,
    unavailable: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, like a browser with storage
    /// disabled or over quota.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.borrow_mut() = unavailable;
    }

    /// Number of stored entries across both scopes.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn check(&self) -> Result<(), StorageError> {
        if *self.unavailable.borrow() {
            Err(StorageError::Unavailable("storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.borrow().get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries
            .borrow_mut()
            .insert((scope, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.borrow_mut().remove(&(scope, key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let store = MemoryStore::new();
        store.set(Scope::Tab, "k", "tab").unwrap();
        store.set(Scope::Browser, "k", "browser").unwrap();

        assert_eq!(store.get(Scope::Tab, "k").unwrap().as_deref(), Some("tab"));
        assert_eq!(
            store.get(Scope::Browser, "k").unwrap().as_deref(),
            Some("browser")
        );

        store.remove(Scope::Tab, "k").unwrap();
        assert_eq!(store.get(Scope::Tab, "k").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set(Scope::Browser, "shared", "1").unwrap();
        assert_eq!(b.get(Scope::Browser, "shared").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn unavailable_store_errors() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get(Scope::Tab, "k"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.set(Scope::Tab, "k", "v").is_err());
    }
}
