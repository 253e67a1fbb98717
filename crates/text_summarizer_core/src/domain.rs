//! crates/text_summarizer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a summary record.
pub type SummaryId = i64;

/// Smallest number of sentences a client may request.
pub const MIN_SENTENCE_COUNT: i32 = 5;
/// Largest number of sentences a client may request.
pub const MAX_SENTENCE_COUNT: i32 = 30;
/// Sentence count used when the client does not pick one.
pub const DEFAULT_SENTENCE_COUNT: i32 = 10;

/// The extractive algorithms a client can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SummarizationMethod {
    #[default]
    Lsa,
    LexRank,
    TextRank,
    Edmundson,
}

impl SummarizationMethod {
    /// Every method, in the order they are advertised to clients.
    pub const ALL: [SummarizationMethod; 4] = [
        SummarizationMethod::Lsa,
        SummarizationMethod::LexRank,
        SummarizationMethod::TextRank,
        SummarizationMethod::Edmundson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummarizationMethod::Lsa => "lsa",
            SummarizationMethod::LexRank => "lex_rank",
            SummarizationMethod::TextRank => "text_rank",
            SummarizationMethod::Edmundson => "edmundson",
        }
    }
}

impl fmt::Display for SummarizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known summarization method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown summarization method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for SummarizationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummarizationMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// One stored URL together with its summary and request metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub id: SummaryId,
    pub url: String,
    pub summary: String,
    /// `None` only for rows written before the method was recorded.
    pub summarization_method: Option<SummarizationMethod>,
    pub sentence_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// The data needed to create a new record. The summary always starts empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSummary {
    pub url: String,
    pub summarization_method: SummarizationMethod,
    pub sentence_count: i32,
}

/// A client-issued overwrite of a record's URL and summary text.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryUpdate {
    pub url: String,
    pub summary: String,
}

/// The work handed to the background dispatcher after a record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryJob {
    pub id: SummaryId,
    pub url: String,
    pub summarization_method: SummarizationMethod,
    pub sentence_count: i32,
}
