use std::collections::VecDeque;

use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::Result;
use crate::index::SearchIndex;

/// History capacity: one request per minute of a day.
const REQUESTS_LIMIT: usize = 1440;

/// Read-only search wrapper that remembers the outcome of the most
/// recent 1440 requests (oldest evicted first) and counts
/// how many of the retained ones came back empty. It holds no
/// index-mutating privileges. Requests that fail to parse propagate
/// the error and are not recorded.
pub struct RequestQueue<'a> {
    index: &'a SearchIndex,
    /// `true` for requests that produced no results.
    requests: VecDeque<bool>,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            requests: VecDeque::with_capacity(REQUESTS_LIMIT),
            no_result_count: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let results = self.index.find_top_documents(raw_query)?;
        self.record(results.is_empty());
        Ok(results)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let results = self.index.find_top_documents_with_status(raw_query, status)?;
        self.record(results.is_empty());
        Ok(results)
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let results = self.index.find_top_documents_with(raw_query, predicate)?;
        self.record(results.is_empty());
        Ok(results)
    }

    /// How many of the retained requests produced no results.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    fn record(&mut self, is_no_result: bool) {
        if self.requests.len() == REQUESTS_LIMIT && self.requests.pop_front() == Some(true) {
            self.no_result_count -= 1;
        }
        self.requests.push_back(is_no_result);
        if is_no_result {
            self.no_result_count += 1;
        }
    }
}
