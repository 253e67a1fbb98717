//! crates/text_summarizer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or caches.

use async_trait::async_trait;
use crate::domain::{NewSummary, SummarizationMethod, SummaryId, SummaryRecord, SummaryUpdate};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for summary records. Every method touches at most one row.
#[async_trait]
pub trait SummaryRepository: Send + Sync {
    /// Inserts a record with an empty summary and returns its new id.
    async fn create(&self, new_summary: NewSummary) -> PortResult<SummaryId>;

    async fn get_by_id(&self, id: SummaryId) -> PortResult<Option<SummaryRecord>>;

    /// All records, oldest first.
    async fn get_all(&self) -> PortResult<Vec<SummaryRecord>>;

    /// Overwrites url and summary. Returns `None` when no row has this id.
    async fn update(&self, id: SummaryId, update: SummaryUpdate) -> PortResult<Option<SummaryRecord>>;

    /// Removes the row if it exists.
    async fn delete(&self, id: SummaryId) -> PortResult<()>;

    /// Writes only the summary text. Returns `false` when the row is gone.
    async fn set_summary_text(&self, id: SummaryId, summary: &str) -> PortResult<bool>;
}

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Fetches the page at `url` and returns its summary, one sentence per line.
    async fn summarize(
        &self,
        url: &str,
        method: SummarizationMethod,
        sentence_count: usize,
    ) -> PortResult<String>;
}

/// How many requests a single client may make to one route per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub times: u64,
    pub seconds: u64,
}

impl RatePolicy {
    pub const fn new(times: u64, seconds: u64) -> Self {
        Self { times, seconds }
    }
}

/// The outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    /// The window is exhausted; the client may retry after this many seconds.
    Rejected { retry_after_secs: u64 },
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts one request against `key` and decides whether to let it through.
    async fn check(&self, key: &str, policy: RatePolicy) -> PortResult<Admission>;
}
