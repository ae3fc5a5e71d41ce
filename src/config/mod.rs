//! Configuration module for the relay.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::AppError;

/// Default upstream endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://gelbooru.com/index.php";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Base URL of the DAPI endpoint
    pub upstream_url: String,
    /// Timeout applied to every outbound request
    pub upstream_timeout: Duration,
    /// User agent sent upstream
    pub user_agent: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("RELAY_BIND_ADDR") {
            Some(addr) => addr,
            None => format!("0.0.0.0:{}", lookup("PORT").unwrap_or_else(|| "5000".into())),
        };
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("Invalid bind address {bind_addr:?}: {e}")))?;

        let upstream_url =
            lookup("RELAY_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        reqwest::Url::parse(&upstream_url).map_err(|e| {
            AppError::Config(format!("Invalid RELAY_UPSTREAM_URL {upstream_url:?}: {e}"))
        })?;

        let timeout_secs = match lookup("RELAY_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid RELAY_UPSTREAM_TIMEOUT_SECS {raw:?}: {e}"))
            })?,
            None => 30,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "RELAY_UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let user_agent = lookup("RELAY_USER_AGENT")
            .unwrap_or_else(|| format!("booru-relay/{}", env!("CARGO_PKG_VERSION")));

        let log_level = lookup("RELAY_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            bind_addr,
            upstream_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            user_agent,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("booru-relay/"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_port_fallback() {
        let config = config_from(&[("PORT", "8081")]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8081");
    }

    #[test]
    fn test_bind_addr_wins_over_port() {
        let config = config_from(&[("PORT", "8081"), ("RELAY_BIND_ADDR", "127.0.0.1:9000")])
            .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RELAY_UPSTREAM_URL", "http://localhost:1234/index.php"),
            ("RELAY_UPSTREAM_TIMEOUT_SECS", "5"),
            ("RELAY_USER_AGENT", "tester"),
            ("RELAY_LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.upstream_url, "http://localhost:1234/index.php");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tester");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            config_from(&[("PORT", "not-a-port")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("RELAY_UPSTREAM_TIMEOUT_SECS", "soon")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("RELAY_UPSTREAM_TIMEOUT_SECS", "0")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("RELAY_UPSTREAM_URL", "not a url")]),
            Err(AppError::Config(_))
        ));
    }
}
