//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SummaryRepository` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use text_summarizer_core::domain::{NewSummary, SummaryId, SummaryRecord, SummaryUpdate};
use text_summarizer_core::ports::{PortError, PortResult, SummaryRepository};

const RECORD_COLUMNS: &str =
    "id, url, summary, summarization_method, sentence_count, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SummaryRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    url: String,
    summary: String,
    summarization_method: Option<String>,
    sentence_count: Option<i32>,
    created_at: DateTime<Utc>,
}

impl SummaryRow {
    fn to_domain(self) -> SummaryRecord {
        SummaryRecord {
            id: self.id,
            url: self.url,
            summary: self.summary,
            // Values written by older releases that no longer parse are dropped.
            summarization_method: self.summarization_method.and_then(|m| m.parse().ok()),
            sentence_count: self.sentence_count,
            created_at: self.created_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `SummaryRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryRepository for DbAdapter {
    async fn create(&self, new_summary: NewSummary) -> PortResult<SummaryId> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO text_summary (url, summary, summarization_method, sentence_count) \
             VALUES ($1, '', $2, $3) RETURNING id",
        )
        .bind(&new_summary.url)
        .bind(new_summary.summarization_method.as_str())
        .bind(new_summary.sentence_count)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(id)
    }

    async fn get_by_id(&self, id: SummaryId) -> PortResult<Option<SummaryRecord>> {
        let record = sqlx::query_as::<_, SummaryRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM text_summary WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(SummaryRow::to_domain))
    }

    async fn get_all(&self) -> PortResult<Vec<SummaryRecord>> {
        let records = sqlx::query_as::<_, SummaryRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM text_summary ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let summaries = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(summaries)
    }

    async fn update(&self, id: SummaryId, update: SummaryUpdate) -> PortResult<Option<SummaryRecord>> {
        let record = sqlx::query_as::<_, SummaryRow>(&format!(
            "UPDATE text_summary SET url = $1, summary = $2 WHERE id = $3 RETURNING {RECORD_COLUMNS}"
        ))
        .bind(&update.url)
        .bind(&update.summary)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(SummaryRow::to_domain))
    }

    async fn delete(&self, id: SummaryId) -> PortResult<()> {
        sqlx::query("DELETE FROM text_summary WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn set_summary_text(&self, id: SummaryId, summary: &str) -> PortResult<bool> {
        let result = sqlx::query("UPDATE text_summary SET summary = $1 WHERE id = $2")
            .bind(summary)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }
}
