use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::index::SearchIndex;

/// How an operation schedules its per-element work. The two policies
/// are contractually equivalent: any operation accepting a policy must
/// produce the same result under both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

/// Answers every query over the worker pool. The result at position
/// `i` always belongs to `queries[i]`, whatever order the workers
/// finish in. The first query that fails to parse fails the batch.
pub fn process_queries<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Vec<Document>>>
where
    Q: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| index.find_top_documents(query.as_ref()))
        .collect()
}

/// Flattens [`process_queries`] into one list, concatenating per-query
/// segments in query order.
pub fn process_queries_joined<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Document>>
where
    Q: AsRef<str> + Sync,
{
    Ok(process_queries(index, queries)?
        .into_iter()
        .flatten()
        .collect())
}
