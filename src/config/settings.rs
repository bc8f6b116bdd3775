use log::LevelFilter;
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use super::{refresh, server, solana, sources};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ENV var {0} has invalid value: {1}")]
    InvalidValue(&'static str, String),

    #[error("ENV var {0} must not be empty")]
    Empty(&'static str),
}

/// Endpoints of the upstream market-data providers.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub coingecko: String,
    pub raydium: String,
    pub pumpfun: String,
    pub solana_rpc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub asset_root: PathBuf,
    pub log_level: LevelFilter,
    pub fetch_timeout: Duration,
    pub price_refresh: Duration,
    pub network_refresh: Duration,
    pub tokens_refresh: Duration,
    pub price_window: usize,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: server::PORT,
            asset_root: PathBuf::from(server::ASSET_ROOT),
            log_level: LevelFilter::Info,
            fetch_timeout: Duration::from_secs(sources::FETCH_TIMEOUT_SECS),
            price_refresh: Duration::from_secs(refresh::PRICE_REFRESH_SECS),
            network_refresh: Duration::from_secs(refresh::NETWORK_REFRESH_SECS),
            tokens_refresh: Duration::from_secs(refresh::TOKENS_REFRESH_SECS),
            price_window: refresh::PRICE_WINDOW,
            endpoints: Endpoints {
                coingecko: sources::COINGECKO_API.to_string(),
                raydium: sources::RAYDIUM_API.to_string(),
                pumpfun: sources::PUMPFUN_API.to_string(),
                solana_rpc: solana::PROVIDERS.iter().map(|v| v.to_string()).collect(),
            },
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(port) = parse_var(&lookup, "PORT")? {
            settings.port = port;
        }
        if let Some(root) = lookup("ASSET_ROOT") {
            settings.asset_root = PathBuf::from(root);
        }
        if let Some(level) = parse_var(&lookup, "LOG_LEVEL")? {
            settings.log_level = level;
        }
        if let Some(secs) = parse_secs(&lookup, "FETCH_TIMEOUT_SECS")? {
            settings.fetch_timeout = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "PRICE_REFRESH_SECS")? {
            settings.price_refresh = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "NETWORK_REFRESH_SECS")? {
            settings.network_refresh = secs;
        }
        if let Some(secs) = parse_secs(&lookup, "TOKENS_REFRESH_SECS")? {
            settings.tokens_refresh = secs;
        }
        if let Some(window) = parse_var::<usize, _>(&lookup, "PRICE_WINDOW")? {
            if window == 0 {
                return Err(ConfigError::InvalidValue("PRICE_WINDOW", window.to_string()));
            }
            settings.price_window = window;
        }
        if let Some(url) = lookup("COINGECKO_API") {
            settings.endpoints.coingecko = url;
        }
        if let Some(url) = lookup("RAYDIUM_API") {
            settings.endpoints.raydium = url;
        }
        if let Some(url) = lookup("PUMPFUN_API") {
            settings.endpoints.pumpfun = url;
        }
        if let Some(urls) = lookup("SOLANA_RPC_URLS") {
            let urls: Vec<String> = urls
                .split(',')
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();

            if urls.is_empty() {
                return Err(ConfigError::Empty("SOLANA_RPC_URLS"));
            }
            settings.endpoints.solana_rpc = urls;
        }

        Ok(settings)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<u64, _>(lookup, key)? {
        Some(0) => Err(ConfigError::InvalidValue(key, "0".to_string())),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.price_refresh, Duration::from_secs(60));
        assert_eq!(settings.network_refresh, Duration::from_secs(120));
        assert_eq!(settings.tokens_refresh, Duration::from_secs(300));
        assert_eq!(settings.price_window, 7);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("PRICE_REFRESH_SECS", "5"),
            ("SOLANA_RPC_URLS", "http://a, http://b ,"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.price_refresh, Duration::from_secs(5));
        assert_eq!(settings.endpoints.solana_rpc, vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_invalid_values() {
        let res = Settings::from_lookup(lookup_from(&[("PORT", "moon")]));
        assert_eq!(
            res,
            Err(ConfigError::InvalidValue("PORT", "moon".to_string()))
        );

        let res = Settings::from_lookup(lookup_from(&[("TOKENS_REFRESH_SECS", "0")]));
        assert!(matches!(
            res,
            Err(ConfigError::InvalidValue("TOKENS_REFRESH_SECS", _))
        ));

        let res = Settings::from_lookup(lookup_from(&[("SOLANA_RPC_URLS", " , ")]));
        assert_eq!(res, Err(ConfigError::Empty("SOLANA_RPC_URLS")));
    }
}
