//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service name used in startup logs
    pub app_name: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Default tracing level when RUST_LOG is unset
    pub log_level: String,

    /// File receiving reported errors
    pub log_path: String,

    /// API version segment, routes live under /api/<version>
    pub api_version: String,

    /// Bounded queue size of the error log channel
    pub log_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let app_name = var("APP_NAME", "core-banking");

        let host = var("HOST", "0.0.0.0");

        let port = var("PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let log_level = var("LOG_LEVEL", "debug").to_lowercase();

        let log_path = var("LOG_PATH", "log/transactions.log");

        let api_version = var("API_VERSION", "v1");
        if api_version.is_empty() || api_version.contains('/') {
            return Err(ConfigError::InvalidValue("API_VERSION"));
        }

        let log_channel_capacity = var("LOG_CHANNEL_CAPACITY", "100")
            .parse()
            .ok()
            .filter(|capacity: &usize| *capacity > 0)
            .ok_or(ConfigError::InvalidValue("LOG_CHANNEL_CAPACITY"))?;

        Ok(Self {
            app_name,
            host,
            port,
            log_level,
            log_path,
            api_version,
            log_channel_capacity,
        })
    }

    /// Prefix all ledger routes are nested under
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }

    /// Default `EnvFilter` directive
    pub fn default_log_filter(&self) -> String {
        format!(
            "core_banking={level},tower_http={level}",
            level = self.log_level
        )
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
