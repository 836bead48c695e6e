//! Session store: the only component that reads or writes persisted auth
//! state and the cached financial data tied to it.
//!
//! - **Token**: tab scope, so closing the tab ends the session
//! - **User snapshot, balances, transactions**: browser scope, JSON encoded

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Balance, Transaction, UserInfo};
use crate::storage::{KeyValueStore, Scope, StorageError};

pub const TOKEN_KEY: &str = "cryptohub_auth_token_v1";
pub const USER_KEY: &str = "cryptohub_user_v1";
pub const BALANCES_KEY: &str = "cryptohub_balances_v1";
pub const TRANSACTIONS_KEY: &str = "cryptohub_transactions_v1";

/// Every persisted key with its scope. `clear_session` removes all of them.
pub const SESSION_KEYS: [(Scope, &str); 4] = [
    (Scope::Tab, TOKEN_KEY),
    (Scope::Browser, USER_KEY),
    (Scope::Browser, BALANCES_KEY),
    (Scope::Browser, TRANSACTIONS_KEY),
];

/// Values older builds wrote when serializing a missing token.
const TOKEN_SENTINELS: [&str; 2] = ["undefined", "null"];

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Bearer token paired with the cached profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

/// Typed access to the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    backend: S,
}

/// True for a token worth sending: present, non-blank, not a sentinel.
pub fn is_usable_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && !TOKEN_SENTINELS.contains(&trimmed)
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Persist a freshly issued session. The token is stored verbatim.
    ///
    /// All or nothing: if the profile cannot be written the token is removed
    /// again, so a failed write never leaves a signed-in tab behind.
    pub fn set_session(&self, token: &str, user: &UserInfo) -> Result<(), SessionError> {
        let user_json = encode(USER_KEY, user)?;
        self.backend.set(Scope::Tab, TOKEN_KEY, token)?;
        if let Err(e) = self.backend.set(Scope::Browser, USER_KEY, &user_json) {
            if let Err(undo) = self.backend.remove(Scope::Tab, TOKEN_KEY) {
                log::error!("could not roll back token after failed profile write: {undo}");
            }
            return Err(e.into());
        }
        log::debug!("session stored for user {}", user.id);
        Ok(())
    }

    /// Stored token, or `None` when absent, a sentinel, or unreadable.
    pub fn token(&self) -> Option<String> {
        match self.backend.get(Scope::Tab, TOKEN_KEY) {
            Ok(Some(raw)) if is_usable_token(&raw) => Some(raw),
            Ok(_) => None,
            Err(e) => {
                log::warn!("token lookup failed, treating session as absent: {e}");
                None
            }
        }
    }

    pub fn has_valid_token(&self) -> bool {
        self.token().is_some()
    }

    /// Cached profile. Malformed JSON is logged and treated as absent.
    pub fn user(&self) -> Option<UserInfo> {
        self.read_json(USER_KEY)
    }

    /// Token and user together, if both are present.
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user: self.user()?,
        })
    }

    /// Remove the token, the profile and every cached financial value.
    ///
    /// Every key is attempted; the first failure is returned.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        let mut first_err = None;
        for (scope, key) in SESSION_KEYS {
            if let Err(e) = self.backend.remove(scope, key) {
                log::warn!("failed to remove `{key}`: {e}");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    // ── Financial caches ────────────────────────────────────────────

    pub fn cache_balances(&self, balances: &[Balance]) -> Result<(), SessionError> {
        self.write_json(BALANCES_KEY, &balances)
    }

    pub fn cached_balances(&self) -> Option<Vec<Balance>> {
        self.read_json(BALANCES_KEY)
    }

    pub fn cache_transactions(&self, transactions: &[Transaction]) -> Result<(), SessionError> {
        self.write_json(TRANSACTIONS_KEY, &transactions)
    }

    pub fn cached_transactions(&self) -> Option<Vec<Transaction>> {
        self.read_json(TRANSACTIONS_KEY)
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SessionError> {
        let json = encode(key, value)?;
        self.backend.set(Scope::Browser, key, &json)?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(Scope::Browser, key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("failed to read `{key}`: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring malformed `{key}`: {e}");
                None
            }
        }
    }
}

fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> Result<String, SessionError> {
    serde_json::to_string(value).map_err(|source| SessionError::Encode { key, source })
}
