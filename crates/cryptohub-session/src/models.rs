//! Wire types for the CryptoHub REST API.
//!
//! Every response body is a JSON object carrying at least `success`; the
//! client strips that envelope before decoding into the types below.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Users ───────────────────────────────────────────────────────────

/// Cached profile snapshot stored alongside the bearer token.
///
/// Fields the client does not model are kept in `extra` so a stored
/// snapshot reads back exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: None,
            extra: Map::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// First name if the server provided one, otherwise the username.
    pub fn display_name(&self) -> String {
        self.extra
            .get("firstname")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
            .to_string()
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub message: Option<String>,
}

/// Registration payload. The confirmation password is checked client-side
/// and never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Body of endpoints that only report a human-readable outcome.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
}

// ── Market ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAsset {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub change_24h: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataResponse {
    #[serde(alias = "data")]
    pub assets: Vec<MarketAsset>,
}

// ── Investments ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub plan: Option<String>,
    pub asset: String,
    pub amount: f64,
    #[serde(default)]
    pub current_value: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvestmentsResponse {
    pub investments: Vec<Investment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInvestmentRequest {
    pub plan: String,
    pub asset: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvestmentResponse {
    pub investment: Investment,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Wallet ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub asset: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalancesResponse {
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalanceResponse {
    pub balance: Balance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub asset: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawRequest {
    pub address: String,
    pub asset: String,
    pub amount: f64,
}

// ── Transactions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub asset: String,
    pub amount: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub message: Option<String>,
}
