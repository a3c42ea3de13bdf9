//! Transfer limit configuration.
//!
//! The daily ceiling is loaded once at startup from `cardbank.toml`, with a
//! `DAILY_TRANSFER_LIMIT` environment variable taking precedence, and frozen
//! into a [`LimitPolicy`]. The value is a decimal amount string ("500.00",
//! parsed to minor units) or the literal "unlimited"; running processes never
//! consult mutable configuration.

use crate::core::limit::LimitPolicy;
use crate::errors::{Error, Result};
use crate::money;
use serde::Deserialize;
use std::path::Path;

/// Ceiling applied when neither the config file nor the environment sets one.
pub const DEFAULT_DAILY_LIMIT: &str = "50000.00";

/// Configuration structure representing the entire cardbank.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Transfer-related settings
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// The `[transfer]` section of cardbank.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransferConfig {
    /// Daily transfer ceiling as a decimal amount string, e.g. "500.00"
    pub daily_limit: Option<String>,
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse cardbank.toml: {e}"),
    })
}

/// Loads configuration from the default location (./cardbank.toml).
/// A missing file is not an error; defaults apply.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("cardbank.toml");
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

/// Resolves the daily limit policy from the configuration, honoring the
/// `DAILY_TRANSFER_LIMIT` environment override.
pub fn limit_policy(config: &Config) -> Result<LimitPolicy> {
    resolve(config, std::env::var("DAILY_TRANSFER_LIMIT").ok())
}

fn resolve(config: &Config, env_override: Option<String>) -> Result<LimitPolicy> {
    let raw = env_override
        .or_else(|| config.transfer.daily_limit.clone())
        .unwrap_or_else(|| DEFAULT_DAILY_LIMIT.to_string());
    if raw.trim().eq_ignore_ascii_case("unlimited") {
        return Ok(LimitPolicy::unlimited());
    }
    let ceiling = money::parse(&raw).map_err(|e| Error::Config {
        message: format!("Invalid daily transfer limit {raw:?}: {e}"),
    })?;
    Ok(LimitPolicy::daily(ceiling))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_transfer_config() {
        let toml_str = r#"
            [transfer]
            daily_limit = "500.00"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transfer.daily_limit.as_deref(), Some("500.00"));
        assert_eq!(
            resolve(&config, None).unwrap(),
            LimitPolicy::daily(50_000)
        );
    }

    #[test]
    fn test_env_override_wins() {
        let config: Config = toml::from_str("[transfer]\ndaily_limit = \"500.00\"").unwrap();
        let policy = resolve(&config, Some("123.45".to_string())).unwrap();
        assert_eq!(policy, LimitPolicy::daily(12_345));
    }

    #[test]
    fn test_default_ceiling_applies() {
        let policy = resolve(&Config::default(), None).unwrap();
        assert_eq!(policy, LimitPolicy::daily(5_000_000));
    }

    #[test]
    fn test_unlimited_disables_the_ceiling() {
        let config: Config = toml::from_str("[transfer]\ndaily_limit = \"unlimited\"").unwrap();
        assert_eq!(resolve(&config, None).unwrap(), LimitPolicy::unlimited());
        // The override form works too
        let policy = resolve(&Config::default(), Some("Unlimited".to_string())).unwrap();
        assert!(!policy.is_limited());
    }

    #[test]
    fn test_malformed_limit_is_a_config_error() {
        let result = resolve(&Config::default(), Some("lots".to_string()));
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
    }

    #[test]
    fn test_empty_toml_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.transfer.daily_limit.is_none());
    }
}
