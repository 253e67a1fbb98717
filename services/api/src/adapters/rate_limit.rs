//! services/api/src/adapters/rate_limit.rs
//!
//! Adapters for the `RateLimiter` port. All of them count requests in fixed
//! windows: the first request for a key opens a window of `policy.seconds`, and
//! requests beyond `policy.times` inside that window are rejected.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use text_summarizer_core::ports::{Admission, PortError, PortResult, RateLimiter, RatePolicy};
use tokio::sync::Mutex;

fn admission(count: u64, policy: RatePolicy, remaining: Duration) -> Admission {
    if count <= policy.times {
        Admission::Allowed
    } else {
        // Round up so clients never retry into the same window.
        let millis = remaining.as_millis() as u64;
        Admission::Rejected { retry_after_secs: millis.div_ceil(1000).max(1) }
    }
}

//=========================================================================================
// Redis
//=========================================================================================

/// Counts requests in Redis so every instance of the service shares one budget.
#[derive(Clone)]
pub struct RedisRateLimiter {
    connection: ConnectionManager,
}

impl RedisRateLimiter {
    /// Connects to Redis. The connection manager reconnects on its own afterwards.
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str, policy: RatePolicy) -> PortResult<Admission> {
        let mut connection = self.connection.clone();
        // Opening the window, counting and reading its expiry happen atomically.
        let (count, ttl_millis): (u64, i64) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(key)
            .arg(0)
            .arg("NX")
            .arg("EX")
            .arg(policy.seconds)
            .ignore()
            .cmd("INCR")
            .arg(key)
            .cmd("PTTL")
            .arg(key)
            .query_async(&mut connection)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let remaining = match u64::try_from(ttl_millis) {
            Ok(millis) => Duration::from_millis(millis),
            Err(_) => {
                // The key has no expiry (e.g. written by hand); without one the
                // window would never close.
                let _: () = redis::cmd("EXPIRE")
                    .arg(key)
                    .arg(policy.seconds)
                    .query_async(&mut connection)
                    .await
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                Duration::from_secs(policy.seconds)
            }
        };
        Ok(admission(count, policy, remaining))
    }
}

//=========================================================================================
// In-process
//=========================================================================================

struct Window {
    expires_at: Instant,
    count: u64,
}

/// Counts requests in this process only. Used when no Redis endpoint is configured.
#[derive(Default)]
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str, policy: RatePolicy) -> PortResult<Admission> {
        let length = Duration::from_secs(policy.seconds);
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        // Drop expired windows so the map does not grow with every client ever seen.
        windows.retain(|_, w| w.expires_at > now);

        let window = windows.entry(key.to_string()).or_insert(Window {
            expires_at: now + length,
            count: 0,
        });
        window.count += 1;
        let remaining = window.expires_at.saturating_duration_since(now);
        Ok(admission(window.count, policy, remaining))
    }
}

//=========================================================================================
// No-op
//=========================================================================================

/// Admits every request. Used when the service runs in testing mode.
#[derive(Clone, Copy, Default)]
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn check(&self, _key: &str, _policy: RatePolicy) -> PortResult<Admission> {
        Ok(Admission::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_rounds_up_to_whole_seconds() {
        let policy = RatePolicy::new(1, 60);
        assert_eq!(admission(1, policy, Duration::from_secs(60)), Admission::Allowed);
        assert_eq!(
            admission(2, policy, Duration::from_millis(1_200)),
            Admission::Rejected { retry_after_secs: 2 }
        );
        assert_eq!(
            admission(2, policy, Duration::ZERO),
            Admission::Rejected { retry_after_secs: 1 }
        );
    }

    #[tokio::test]
    async fn in_memory_limiter_rejects_after_the_budget_is_spent() {
        let limiter = InMemoryRateLimiter::new();
        let policy = RatePolicy::new(2, 60);
        assert_eq!(limiter.check("read:1.2.3.4", policy).await.unwrap(), Admission::Allowed);
        assert_eq!(limiter.check("read:1.2.3.4", policy).await.unwrap(), Admission::Allowed);
        assert!(matches!(
            limiter.check("read:1.2.3.4", policy).await.unwrap(),
            Admission::Rejected { retry_after_secs } if retry_after_secs <= 60
        ));
        // Other clients have their own budget.
        assert_eq!(limiter.check("read:5.6.7.8", policy).await.unwrap(), Admission::Allowed);
    }

    #[tokio::test]
    async fn in_memory_window_resets_after_expiry() {
        let limiter = InMemoryRateLimiter::new();
        let policy = RatePolicy::new(1, 1);
        assert_eq!(limiter.check("k", policy).await.unwrap(), Admission::Allowed);
        assert!(matches!(limiter.check("k", policy).await.unwrap(), Admission::Rejected { .. }));
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(limiter.check("k", policy).await.unwrap(), Admission::Allowed);
    }

    #[tokio::test]
    async fn noop_limiter_admits_everything() {
        let limiter = NoopRateLimiter;
        for _ in 0..100 {
            assert_eq!(limiter.check("k", RatePolicy::new(1, 60)).await.unwrap(), Admission::Allowed);
        }
    }

    // The Redis tests need a server and are skipped unless `REDIS_URL` is set,
    // e.g. `REDIS_URL=redis://127.0.0.1:6379 cargo test -p api`.
    async fn redis() -> Option<(RedisRateLimiter, ConnectionManager)> {
        let url = std::env::var("REDIS_URL").ok()?;
        let limiter = RedisRateLimiter::connect(&url).await.unwrap();
        let raw = limiter.connection.clone();
        Some((limiter, raw))
    }

    fn scratch_key(name: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("summaries-limiter-test:{}:{}:{}", name, std::process::id(), nanos)
    }

    #[tokio::test]
    async fn redis_limiter_counts_in_a_fixed_window() {
        let Some((limiter, mut raw)) = redis().await else {
            return;
        };
        let key = scratch_key("window");
        let policy = RatePolicy::new(2, 60);

        assert_eq!(limiter.check(&key, policy).await.unwrap(), Admission::Allowed);
        assert_eq!(limiter.check(&key, policy).await.unwrap(), Admission::Allowed);
        assert!(matches!(
            limiter.check(&key, policy).await.unwrap(),
            Admission::Rejected { retry_after_secs } if (1..=60).contains(&retry_after_secs)
        ));

        let ttl: i64 = redis::cmd("PTTL").arg(&key).query_async(&mut raw).await.unwrap();
        assert!(ttl > 0 && ttl <= 60_000);
        let count: u64 = redis::cmd("GET").arg(&key).query_async(&mut raw).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn redis_window_resets_after_expiry() {
        let Some((limiter, _)) = redis().await else {
            return;
        };
        let key = scratch_key("reset");
        let policy = RatePolicy::new(1, 1);
        assert_eq!(limiter.check(&key, policy).await.unwrap(), Admission::Allowed);
        assert!(matches!(limiter.check(&key, policy).await.unwrap(), Admission::Rejected { .. }));
        tokio::time::sleep(Duration::from_millis(1_200)).await;
        assert_eq!(limiter.check(&key, policy).await.unwrap(), Admission::Allowed);
    }

    #[tokio::test]
    async fn redis_keys_without_expiry_get_one_back() {
        let Some((limiter, mut raw)) = redis().await else {
            return;
        };
        let key = scratch_key("persistent");
        let _: () = redis::cmd("SET").arg(&key).arg(10).query_async(&mut raw).await.unwrap();

        let policy = RatePolicy::new(3, 60);
        assert_eq!(
            limiter.check(&key, policy).await.unwrap(),
            Admission::Rejected { retry_after_secs: 60 }
        );
        let ttl: i64 = redis::cmd("PTTL").arg(&key).query_async(&mut raw).await.unwrap();
        assert!(ttl > 0 && ttl <= 60_000, "ttl was {}", ttl);
    }
}
