pub mod db;
pub mod html;
pub mod memory;
pub mod rate_limit;
pub mod summarizer;

pub use db::DbAdapter;
pub use memory::InMemoryDb;
pub use rate_limit::{InMemoryRateLimiter, NoopRateLimiter, RedisRateLimiter};
pub use summarizer::ExtractiveSummarizer;
