//! services/api/src/web/summary_task.rs
//!
//! The background worker that fills in a record's summary after it is created.
//! It runs detached from the request that spawned it and never reports back to
//! the client; the outcome is only visible by reading the record later.

use crate::web::state::AppState;
use std::sync::Arc;
use text_summarizer_core::domain::SummaryJob;
use text_summarizer_core::ports::{PortError, SummarizationService, SummaryRepository};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Every failure message stored in place of a summary ends with this.
pub const FAILURE_SUFFIX: &str = "; please try another URL";

pub fn empty_summary_message() -> String {
    format!(
        "Summary generation failed resulting in an empty summary{}",
        FAILURE_SUFFIX
    )
}

pub fn failed_summary_message(reason: &str) -> String {
    format!("Summary generation failed due to an error: {}{}", reason, FAILURE_SUFFIX)
}

/// Spawns `generate_summary` for `job` on the runtime.
pub fn spawn_summary_task(app_state: Arc<AppState>, job: SummaryJob) -> JoinHandle<()> {
    tokio::spawn(async move {
        generate_summary(app_state.db.as_ref(), app_state.summarizer.as_ref(), job).await;
    })
}

/// Summarizes the job's URL and writes the result, or a failure message, back
/// to the record. A record deleted in the meantime is left alone.
pub async fn generate_summary(
    db: &dyn SummaryRepository,
    summarizer: &dyn SummarizationService,
    job: SummaryJob,
) {
    info!(
        "Generating summary for record {} ({}, {} sentences)",
        job.id, job.summarization_method, job.sentence_count
    );

    let sentence_count = usize::try_from(job.sentence_count).unwrap_or_default();
    let text = match summarizer
        .summarize(&job.url, job.summarization_method, sentence_count)
        .await
    {
        Ok(summary) if summary.trim().is_empty() => {
            warn!("Summary for record {} came back empty", job.id);
            empty_summary_message()
        }
        Ok(summary) => summary,
        Err(e) => {
            let reason = match e {
                PortError::NotFound(message) | PortError::Unexpected(message) => message,
            };
            warn!("Summarizing {} for record {} failed: {}", job.url, job.id, reason);
            failed_summary_message(&reason)
        }
    };

    match db.set_summary_text(job.id, &text).await {
        Ok(true) => info!("Stored summary for record {}", job.id),
        Ok(false) => warn!("Record {} was deleted before its summary was ready", job.id),
        Err(e) => error!("Failed to store summary for record {}: {:?}", job.id, e),
    }
}
