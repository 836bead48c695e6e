//! Session and API layer for the CryptoHub web client.
//!
//! This crate contains:
//! - **Session store**: the single owner of persisted auth state and
//!   cached financial data
//! - **Auth gate**: per-page-load render/redirect rules
//! - **Nav presenter**: which navigation items a session should see
//! - **REST client**: typed endpoints over a pluggable HTTP transport
//! - **Flows**: login, registration and logout
//!
//! It has no browser dependencies; `cryptohub-web` supplies the storage and
//! transport implementations.

pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod gate;
pub mod models;
pub mod nav;
pub mod session;
pub mod storage;
pub mod transport;
pub mod validation;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use gate::{GateDecision, Page, PageClass};
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore, Scope, StorageError};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};
