//! services/api/src/adapters/memory.rs
//!
//! A process-local `SummaryRepository`. Ids and timestamps are assigned the way
//! the database assigns them, so the web layer cannot tell the two apart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use text_summarizer_core::domain::{NewSummary, SummaryId, SummaryRecord, SummaryUpdate};
use text_summarizer_core::ports::{PortResult, SummaryRepository};
use tokio::sync::Mutex;

#[derive(Default)]
struct Table {
    last_id: SummaryId,
    rows: BTreeMap<SummaryId, SummaryRecord>,
}

/// An in-memory adapter that implements the `SummaryRepository` port.
#[derive(Default)]
pub struct InMemoryDb {
    table: Mutex<Table>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SummaryRepository for InMemoryDb {
    async fn create(&self, new_summary: NewSummary) -> PortResult<SummaryId> {
        let mut table = self.table.lock().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(
            id,
            SummaryRecord {
                id,
                url: new_summary.url,
                summary: String::new(),
                summarization_method: Some(new_summary.summarization_method),
                sentence_count: Some(new_summary.sentence_count),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: SummaryId) -> PortResult<Option<SummaryRecord>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> PortResult<Vec<SummaryRecord>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn update(&self, id: SummaryId, update: SummaryUpdate) -> PortResult<Option<SummaryRecord>> {
        let mut table = self.table.lock().await;
        Ok(table.rows.get_mut(&id).map(|record| {
            record.url = update.url;
            record.summary = update.summary;
            record.clone()
        }))
    }

    async fn delete(&self, id: SummaryId) -> PortResult<()> {
        self.table.lock().await.rows.remove(&id);
        Ok(())
    }

    async fn set_summary_text(&self, id: SummaryId, summary: &str) -> PortResult<bool> {
        let mut table = self.table.lock().await;
        Ok(match table.rows.get_mut(&id) {
            Some(record) => {
                record.summary = summary.to_string();
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_summarizer_core::domain::SummarizationMethod;

    fn new_summary(url: &str) -> NewSummary {
        NewSummary {
            url: url.to_string(),
            summarization_method: SummarizationMethod::TextRank,
            sentence_count: 7,
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let db = InMemoryDb::new();
        let first = db.create(new_summary("https://a.example/")).await.unwrap();
        db.delete(first).await.unwrap();
        let second = db.create(new_summary("https://b.example/")).await.unwrap();
        assert!(first > 0);
        assert!(second > first);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_metadata() {
        let db = InMemoryDb::new();
        let id = db.create(new_summary("https://a.example/")).await.unwrap();
        let before = db.get_by_id(id).await.unwrap().unwrap();

        let after = db
            .update(
                id,
                SummaryUpdate {
                    url: "https://b.example/".to_string(),
                    summary: "edited".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after.url, "https://b.example/");
        assert_eq!(after.summary, "edited");
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.summarization_method, Some(SummarizationMethod::TextRank));
    }

    #[tokio::test]
    async fn missing_rows_are_reported_without_errors() {
        let db = InMemoryDb::new();
        assert!(db.get_by_id(42).await.unwrap().is_none());
        assert!(db
            .update(42, SummaryUpdate { url: String::new(), summary: String::new() })
            .await
            .unwrap()
            .is_none());
        assert!(!db.set_summary_text(42, "late").await.unwrap());
        db.delete(42).await.unwrap();
    }

    #[tokio::test]
    async fn get_all_lists_rows_in_id_order() {
        let db = InMemoryDb::new();
        let a = db.create(new_summary("https://a.example/")).await.unwrap();
        let b = db.create(new_summary("https://b.example/")).await.unwrap();
        let c = db.create(new_summary("https://c.example/")).await.unwrap();
        db.delete(b).await.unwrap();
        let ids: Vec<SummaryId> = db.get_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
