// Shared harness for the integration tests: serves the real router on an
// ephemeral port with in-memory adapters.

use api_lib::{
    adapters::{InMemoryDb, NoopRateLimiter},
    config::Config,
    web::{build_router, AppState},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use text_summarizer_core::domain::SummarizationMethod;
use text_summarizer_core::ports::{
    PortError, PortResult, RateLimiter, SummarizationService, SummaryRepository,
};
use tokio::sync::Semaphore;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub db: Arc<InMemoryDb>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Polls a record until its summary is filled in by the background task.
    pub async fn wait_for_summary(&self, id: i64) -> String {
        for _ in 0..100 {
            if let Some(record) = self.db.get_by_id(id).await.unwrap() {
                if !record.summary.is_empty() {
                    return record.summary;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("summary for record {} was never written", id);
    }
}

/// Returns the same text for every URL.
pub struct StaticSummarizer(pub &'static str);

#[async_trait]
impl SummarizationService for StaticSummarizer {
    async fn summarize(&self, _: &str, _: SummarizationMethod, _: usize) -> PortResult<String> {
        Ok(self.0.to_string())
    }
}

/// Always fails with the given reason.
pub struct FailingSummarizer(pub &'static str);

#[async_trait]
impl SummarizationService for FailingSummarizer {
    async fn summarize(&self, _: &str, _: SummarizationMethod, _: usize) -> PortResult<String> {
        Err(PortError::Unexpected(self.0.to_string()))
    }
}

/// Blocks every call until the test hands out a permit.
pub struct GatedSummarizer {
    pub gate: Arc<Semaphore>,
}

#[async_trait]
impl SummarizationService for GatedSummarizer {
    async fn summarize(&self, url: &str, _: SummarizationMethod, count: usize) -> PortResult<String> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(format!("{} sentences from {}", count, url))
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<String, String> = [
        ("ENVIRONMENT", "dev"),
        ("TESTING", "true"),
        ("DATABASE_TEST_URL", "postgres://unused/test"),
        ("EXPOSE_DOCS", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Config::from_vars(&vars).unwrap()
}

pub async fn spawn_app_with(
    summarizer: Arc<dyn SummarizationService>,
    rate_limiter: Arc<dyn RateLimiter>,
) -> TestApp {
    let db = Arc::new(InMemoryDb::new());
    let app_state = Arc::new(AppState {
        db: db.clone(),
        summarizer,
        rate_limiter,
        config: Arc::new(test_config()),
    });
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        db,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(StaticSummarizer("Stub summary.")), Arc::new(NoopRateLimiter)).await
}
