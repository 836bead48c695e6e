//! Client configuration.
//!
//! The WASM bundle has no runtime environment, so values come from the
//! build environment (`option_env!`) with sane defaults.

use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1_500);
pub const DEFAULT_MARKET_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for every REST path, without a trailing slash.
    pub api_base: String,
    pub request_timeout: Duration,
    /// Pause between a successful login notice and navigation.
    pub redirect_delay: Duration,
    pub market_refresh: Duration,
    /// Deposit address per asset symbol, shown on the deposit page.
    pub deposit_addresses: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            market_refresh: DEFAULT_MARKET_REFRESH,
            deposit_addresses: BTreeMap::new(),
        }
    }
}

/// Raw, unparsed values as they appear in the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawConfig<'a> {
    pub api_base: Option<&'a str>,
    pub request_timeout_ms: Option<&'a str>,
    pub redirect_delay_ms: Option<&'a str>,
    pub market_refresh_ms: Option<&'a str>,
    pub deposit_addresses: Option<&'a str>,
}

impl ClientConfig {
    /// Values baked in at compile time via `CRYPTOHUB_*` variables.
    pub fn from_build_env() -> Self {
        Self::from_raw(RawConfig {
            api_base: option_env!("CRYPTOHUB_API_BASE"),
            request_timeout_ms: option_env!("CRYPTOHUB_REQUEST_TIMEOUT_MS"),
            redirect_delay_ms: option_env!("CRYPTOHUB_REDIRECT_DELAY_MS"),
            market_refresh_ms: option_env!("CRYPTOHUB_MARKET_REFRESH_MS"),
            deposit_addresses: option_env!("CRYPTOHUB_DEPOSIT_ADDRESSES"),
        })
    }

    /// Malformed values are logged and replaced by the default.
    pub fn from_raw(raw: RawConfig<'_>) -> Self {
        let defaults = Self::default();
        let api_base = raw
            .api_base
            .map(|b| b.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);

        Self {
            api_base,
            request_timeout: millis("CRYPTOHUB_REQUEST_TIMEOUT_MS", raw.request_timeout_ms)
                .unwrap_or(defaults.request_timeout),
            redirect_delay: millis("CRYPTOHUB_REDIRECT_DELAY_MS", raw.redirect_delay_ms)
                .unwrap_or(defaults.redirect_delay),
            market_refresh: millis("CRYPTOHUB_MARKET_REFRESH_MS", raw.market_refresh_ms)
                .unwrap_or(defaults.market_refresh),
            deposit_addresses: raw
                .deposit_addresses
                .map(parse_addresses)
                .unwrap_or_default(),
        }
    }

    /// Absolute URL for an API path such as `/login`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn millis(name: &str, raw: Option<&str>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            log::warn!("{name}={raw:?} is not a positive millisecond count, using default");
            None
        }
    }
}

/// `BTC=bc1...,ETH=0x...` into an asset → address map.
fn parse_addresses(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (asset, addr) = pair.split_once('=')?;
            let (asset, addr) = (asset.trim(), addr.trim());
            if asset.is_empty() || addr.is_empty() {
                log::warn!("ignoring malformed deposit address entry {pair:?}");
                return None;
            }
            Some((asset.to_uppercase(), addr.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ClientConfig::from_raw(RawConfig::default()), ClientConfig::default());
    }

    #[test]
    fn parses_overrides() {
        let cfg = ClientConfig::from_raw(RawConfig {
            api_base: Some("https://api.example.com/v1/"),
            request_timeout_ms: Some("5000"),
            redirect_delay_ms: Some("250"),
            market_refresh_ms: None,
            deposit_addresses: Some("btc=bc1qxyz, ETH = 0xabc ,bogus"),
        });
        assert_eq!(cfg.api_base, "https://api.example.com/v1");
        assert_eq!(cfg.url("/login"), "https://api.example.com/v1/login");
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.redirect_delay, Duration::from_millis(250));
        assert_eq!(cfg.market_refresh, DEFAULT_MARKET_REFRESH);
        assert_eq!(cfg.deposit_addresses.len(), 2);
        assert_eq!(cfg.deposit_addresses["BTC"], "bc1qxyz");
        assert_eq!(cfg.deposit_addresses["ETH"], "0xabc");
    }

    #[test]
    fn malformed_durations_fall_back() {
        let cfg = ClientConfig::from_raw(RawConfig {
            request_timeout_ms: Some("soon"),
            redirect_delay_ms: Some("0"),
            ..Default::default()
        });
        assert_eq!(cfg.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(cfg.redirect_delay, DEFAULT_REDIRECT_DELAY);
    }
}
