//! services/api/src/web/ping.rs

use crate::web::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    #[schema(example = "pong!")]
    pub ping: String,
    pub environment: String,
    pub testing: bool,
}

/// Liveness check that also reports how the service is configured.
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is up", body = PingResponse))
)]
pub async fn ping_handler(State(app_state): State<Arc<AppState>>) -> Json<PingResponse> {
    Json(PingResponse {
        ping: "pong!".to_string(),
        environment: app_state.config.environment.clone(),
        testing: app_state.config.testing,
    })
}
