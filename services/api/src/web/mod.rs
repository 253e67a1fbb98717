pub mod error;
pub mod middleware;
pub mod ping;
pub mod rest;
pub mod routes;
pub mod state;
pub mod summary_task;
pub mod validation;

// Re-export the router builder so the binary and the integration tests
// share one application definition.
pub use routes::build_router;
pub use state::AppState;
