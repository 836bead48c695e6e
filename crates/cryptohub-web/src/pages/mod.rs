pub mod dashboard;
pub mod deposit;
pub mod forgot_password;
pub mod home;
pub mod investments;
pub mod login;
pub mod market;
pub mod register;
pub mod transactions;
pub mod transfer;
pub mod verify_email;
pub mod wallet;
pub mod withdraw;

use cryptohub_session::storage::KeyValueStore;
use cryptohub_session::SessionStore;

/// Assets offered in forms when nothing is cached yet.
pub const DEFAULT_ASSETS: [&str; 3] = ["BTC", "ETH", "USDT"];

/// Assets the user holds according to the cached balances, falling back to
/// the default list.
pub fn asset_choices<S: KeyValueStore>(store: &SessionStore<S>) -> Vec<String> {
    let held: Vec<String> = store
        .cached_balances()
        .unwrap_or_default()
        .into_iter()
        .map(|b| b.asset)
        .collect();
    if held.is_empty() {
        DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect()
    } else {
        held
    }
}
