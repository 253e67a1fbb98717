pub mod domain;
pub mod nlp;
pub mod ports;

pub use domain::{
    NewSummary, SummarizationMethod, SummaryId, SummaryJob, SummaryRecord, SummaryUpdate,
    DEFAULT_SENTENCE_COUNT, MAX_SENTENCE_COUNT, MIN_SENTENCE_COUNT,
};
pub use ports::{
    Admission, PortError, PortResult, RateLimiter, RatePolicy, SummarizationService,
    SummaryRepository,
};
