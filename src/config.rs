use std::env;
use std::time::Duration;

use crate::db::{ConnectionSettings, DEFAULT_IDLE_TIMEOUT};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: ConnectionSettings,
    pub idle_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = non_empty("RDB_HOST").unwrap_or_else(|| "localhost".to_string());
        let username = non_empty("RDB_USER").unwrap_or_else(|| "root".to_string());
        let password = lookup("RDB_PASSWORD").unwrap_or_default();

        let mut settings = ConnectionSettings::new(host, username, password);
        settings.database = non_empty("RDB_NAME");
        settings.socket = non_empty("RDB_SOCKET");
        settings.port = non_empty("RDB_PORT")
            .map(|p| parse_number::<u16>("RDB_PORT", p))
            .transpose()?;

        let idle_timeout = non_empty("RDB_IDLE_TIMEOUT_SECS")
            .map(|s| parse_number::<u64>("RDB_IDLE_TIMEOUT_SECS", s))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT);

        let log_level = non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            settings,
            idle_timeout,
            log_level,
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}
