//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection details for the Redis instance that backs rate limiting.
#[derive(Clone, Debug, PartialEq)]
pub struct RedisSettings {
    /// `host:port`
    pub endpoint: String,
    pub password: Option<String>,
}

impl RedisSettings {
    /// Builds a `redis://` URL, percent-encoding the password.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}",
                urlencoding::encode(password),
                self.endpoint
            ),
            None => format!("redis://{}", self.endpoint),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub testing: bool,
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub redis: Option<RedisSettings>,
    pub expose_docs: bool,
    pub cors_allowed_origin: String,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(&std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |name: &str| vars.get(name).map(String::as_str).filter(|v| !v.is_empty());

        let environment = var("ENVIRONMENT").unwrap_or("dev").to_string();
        let testing = parse_bool("TESTING", var("TESTING"), false)?;

        // --- Load Server and Database Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or("0.0.0.0:8000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        // The test database is used whenever the testing flag is on.
        let database_var = if testing { "DATABASE_TEST_URL" } else { "DATABASE_URL" };
        let database_url = var(database_var)
            .ok_or_else(|| ConfigError::MissingVar(database_var.to_string()))?
            .to_string();

        let log_level_str = var("RUST_LOG").unwrap_or("INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Rate Limiter Settings (optional) ---
        let redis = var("REDIS_ENDPOINT").map(|endpoint| RedisSettings {
            endpoint: endpoint.to_string(),
            password: var("REDIS_PASSWORD").map(str::to_string),
        });

        let expose_docs = parse_bool("EXPOSE_DOCS", var("EXPOSE_DOCS"), true)?;
        let cors_allowed_origin = var("CORS_ALLOWED_ORIGIN")
            .unwrap_or("http://localhost:3000")
            .to_string();

        let fetch_timeout_str = var("FETCH_TIMEOUT_SECS").unwrap_or("30");
        let fetch_timeout = fetch_timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue("FETCH_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            environment,
            testing,
            bind_address,
            database_url,
            log_level,
            redis,
            expose_docs,
            cors_allowed_origin,
            fetch_timeout,
        })
    }
}

fn parse_bool(name: &str, value: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}
