//! services/api/src/web/routes.rs
//!
//! Assembles the HTTP router: summary routes with their rate limits, the ping
//! endpoint, CORS, request tracing and, when enabled, the Swagger UI.

use crate::web::{
    middleware::{rate_limit, RouteLimit},
    ping::ping_handler,
    rest::{
        create_summary_handler, delete_summary_handler, list_summaries_handler,
        read_summary_handler, update_summary_handler, ApiDoc,
    },
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use text_summarizer_core::ports::RatePolicy;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const CREATE_LIMIT: RatePolicy = RatePolicy::new(5, 60);
pub const READ_ONE_LIMIT: RatePolicy = RatePolicy::new(3, 60);
pub const READ_ALL_LIMIT: RatePolicy = RatePolicy::new(3, 60);

const MAX_BODY_BYTES: usize = 1024 * 1024;

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(e) => {
            warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    )
}

/// Builds the complete application router around `app_state`.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let limiter = app_state.rate_limiter.clone();
    let limit = |route, policy| RouteLimit::new(limiter.clone(), route, policy);

    let collection = post(create_summary_handler)
        .route_layer(from_fn_with_state(limit("create", CREATE_LIMIT), rate_limit))
        .merge(
            get(list_summaries_handler)
                .route_layer(from_fn_with_state(limit("read_all", READ_ALL_LIMIT), rate_limit)),
        );

    // Update and delete are not limited.
    let item = get(read_summary_handler)
        .route_layer(from_fn_with_state(limit("read_one", READ_ONE_LIMIT), rate_limit))
        .merge(put(update_summary_handler).delete(delete_summary_handler));

    let api_router = Router::new()
        .route("/ping", get(ping_handler))
        .route("/summaries", collection.clone())
        .route("/summaries/", collection)
        .route("/summaries/{id}", item.clone())
        .route("/summaries/{id}/", item)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state.clone());

    let mut app = Router::new().merge(api_router);
    if app_state.config.expose_docs {
        app = app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }
    if let Some(cors) = cors_layer(&app_state.config.cors_allowed_origin) {
        app = app.layer(cors);
    }
    app.layer(TraceLayer::new_for_http())
}
