//! Database configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Configuration for the connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Longest an operation waits for a pooled connection.
    pub acquire_timeout: Duration,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Log every statement through sqlx.
    pub sql_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            sql_logging: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults. A zero
    /// `DB_MAX_CONNECTIONS` counts as unparseable and the minimum is capped
    /// at the maximum.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = Self::new(url);

        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());
        let secs = |key: &str, default: Duration| number(key).map_or(default, Duration::from_secs);

        let max_connections = number("DB_MAX_CONNECTIONS")
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_connections);
        // Never keep more idle connections than the pool may hold.
        let min_connections = number("DB_MIN_CONNECTIONS")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.min_connections)
            .min(max_connections);

        Ok(Self {
            max_connections,
            min_connections,
            acquire_timeout: secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout),
            connect_timeout: secs("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout),
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout),
            sql_logging: lookup("DB_SQL_LOGGING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.sql_logging),
            ..defaults
        })
    }
}
