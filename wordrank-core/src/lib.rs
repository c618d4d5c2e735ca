//! In-memory full-text search: TF-IDF ranking over an inverted index,
//! with a sharded concurrent map guarding parallel maintenance and a
//! rayon-backed batch query orchestrator.

pub mod concurrent_map;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod parallel;
pub mod query;
pub mod request_queue;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use dedup::remove_duplicates;
pub use document::{Document, DocumentId, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::{SearchIndex, MAX_RESULT_COUNT, RELEVANCE_EPSILON};
pub use parallel::{process_queries, process_queries_joined, ExecutionPolicy};
pub use query::Query;
pub use request_queue::RequestQueue;
