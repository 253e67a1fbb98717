//! services/api/src/error.rs
//!
//! Failures that stop the summarizer service from starting or serving. Request
//! level failures never reach this type; they are rendered by `web::error`.

use crate::config::ConfigError;

/// Why `main` gave up.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required variable is missing or unparsable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Postgres could not be reached or the `text_summary` migrations failed.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// `REDIS_ENDPOINT` was set but the rate limiter could not connect.
    #[error("Redis Error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Binding the listen address or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else during startup, such as building the page-fetch client.
    #[error("Startup failed: {0}")]
    Internal(String),
}
