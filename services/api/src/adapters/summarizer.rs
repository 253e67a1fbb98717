//! services/api/src/adapters/summarizer.rs
//!
//! This module contains the adapter that fetches a web page and summarizes it
//! with the core extractive algorithms. It implements the `SummarizationService`
//! port from the `core` crate.

use crate::adapters::html::parse_document;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use text_summarizer_core::domain::SummarizationMethod;
use text_summarizer_core::nlp;
use text_summarizer_core::ports::{PortError, PortResult, SummarizationService};
use tokio::sync::Semaphore;
use tracing::debug;

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` over plain HTTP fetches.
#[derive(Clone)]
pub struct ExtractiveSummarizer {
    client: Client,
    /// Bounds how many pages are ranked at once on the blocking pool.
    ranking_slots: Arc<Semaphore>,
}

impl ExtractiveSummarizer {
    /// Creates a new `ExtractiveSummarizer` whose fetches give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_STRING)
            .build()?;
        let slots = std::thread::available_parallelism().map_or(2, |n| n.get());
        Ok(Self {
            client,
            ranking_slots: Arc::new(Semaphore::new(slots)),
        })
    }

    async fn fetch(&self, url: &str) -> PortResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "fetching {} returned HTTP {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for ExtractiveSummarizer {
    async fn summarize(
        &self,
        url: &str,
        method: SummarizationMethod,
        sentence_count: usize,
    ) -> PortResult<String> {
        let html = self.fetch(url).await?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        let _slot = self
            .ranking_slots
            .acquire()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        // Parsing and ranking are CPU-bound; keep them off the async workers.
        let sentences = tokio::task::spawn_blocking(move || {
            let document = parse_document(&html);
            nlp::summarize(&document, method, sentence_count)
        })
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(sentences.join("\n"))
    }
}
