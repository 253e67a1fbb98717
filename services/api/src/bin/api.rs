//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        DbAdapter, ExtractiveSummarizer, InMemoryRateLimiter, NoopRateLimiter, RedisRateLimiter,
    },
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use text_summarizer_core::ports::RateLimiter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!(
        "Configuration loaded (environment: {}, testing: {}). Starting server...",
        config.environment, config.testing
    );

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let rate_limiter: Arc<dyn RateLimiter> = match (&config.redis, config.testing) {
        (_, true) => {
            info!("Testing mode: rate limiting is disabled.");
            Arc::new(NoopRateLimiter)
        }
        (Some(redis), false) => {
            info!("Connecting to Redis at {}...", redis.endpoint);
            Arc::new(RedisRateLimiter::connect(&redis.url()).await?)
        }
        (None, false) => {
            warn!("REDIS_ENDPOINT is not set; rate limits are tracked per process.");
            Arc::new(InMemoryRateLimiter::new())
        }
    };

    let summarizer = ExtractiveSummarizer::new(config.fetch_timeout)
        .map_err(|e| ApiError::Internal(format!("Failed to build the HTTP client: {}", e)))?;

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        summarizer: Arc::new(summarizer),
        rate_limiter,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    if config.expose_docs {
        info!("Swagger UI available at http://{}/docs", config.bind_address);
    }
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
