//! services/api/src/web/middleware.rs
//!
//! Per-route rate limiting for the summary endpoints.

use crate::web::error::HttpError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use text_summarizer_core::ports::{Admission, RateLimiter, RatePolicy};
use tracing::{error, warn};

const KEY_PREFIX: &str = "summaries-limiter";

/// The limiter state attached to one route and method.
#[derive(Clone)]
pub struct RouteLimit {
    pub limiter: Arc<dyn RateLimiter>,
    /// Names the route in the counter key, e.g. `create`.
    pub route: &'static str,
    pub policy: RatePolicy,
}

impl RouteLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>, route: &'static str, policy: RatePolicy) -> Self {
        Self { limiter, route, policy }
    }

    fn key(&self, client: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, self.route, client)
    }
}

/// The first `X-Forwarded-For` entry, else the peer address, else `unknown`.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware that counts the request against its route's window and answers
/// 429 once the window is spent. If the limiter itself fails, the request goes through.
pub async fn rate_limit(State(limit): State<RouteLimit>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(req.headers(), peer);

    match limit.limiter.check(&limit.key(&client), limit.policy).await {
        Ok(Admission::Allowed) => next.run(req).await,
        Ok(Admission::Rejected { retry_after_secs }) => {
            warn!("Rate limit hit on {} by {}", limit.route, client);
            HttpError::TooManyRequests { retry_after_secs }.into_response()
        }
        Err(e) => {
            error!("Rate limiter unavailable, admitting request: {:?}", e);
            next.run(req).await
        }
    }
}
