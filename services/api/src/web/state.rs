//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use text_summarizer_core::ports::{RateLimiter, SummarizationService, SummaryRepository};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn SummaryRepository>,
    pub summarizer: Arc<dyn SummarizationService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub config: Arc<Config>,
}
