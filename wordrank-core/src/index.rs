use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::parallel::ExecutionPolicy;
use crate::query::{self, Query};
use crate::tokenizer::{is_valid_word, split_into_words};

/// Upper bound on the number of ranked results per query.
pub const MAX_RESULT_COUNT: usize = 5;

/// Relevances closer than this are treated as equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

const INVERTED_INDEX_SHARDS: usize = 16;

#[derive(Debug, Clone, Copy)]
struct DocumentData {
    rating: i32,
    status: DocumentStatus,
}

/// The indexing and ranking core. Documents are write-once: added with
/// their text, status and ratings, then optionally removed.
///
/// Concurrent reads (ranking, matching) against an index that is not
/// being mutated are safe; that is the steady-state workload of
/// [`process_queries`](crate::parallel::process_queries). Mutation goes
/// through `&mut self`, and the parallel removal paths fan per-word
/// work out over the sharded inverted index.
#[derive(Debug)]
pub struct SearchIndex {
    stop_words: HashSet<String>,
    /// word -> (document id -> term frequency). Sharded so parallel
    /// removal can erase postings for different words concurrently.
    word_to_document_freqs: ConcurrentMap<String, HashMap<DocumentId, f64>>,
    id_to_word_freqs: HashMap<DocumentId, HashMap<String, f64>>,
    documents: HashMap<DocumentId, DocumentData>,
    document_ids: Vec<DocumentId>,
}

impl SearchIndex {
    /// Builds an index with a fixed stop-word set. Fails if any stop
    /// word carries a control character.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = HashSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "stop word {word:?} is invalid"
                )));
            }
            words.insert(word.to_string());
        }
        Ok(Self {
            stop_words: words,
            word_to_document_freqs: ConcurrentMap::new(INVERTED_INDEX_SHARDS),
            id_to_word_freqs: HashMap::new(),
            documents: HashMap::new(),
            document_ids: Vec::new(),
        })
    }

    /// Convenience constructor from whitespace-separated stop words.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    /// Tokenizes `text`, records per-word term frequencies, and updates
    /// the inverted index. Validation happens before any mutation: on
    /// error the index is unchanged.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 || self.documents.contains_key(&document_id) {
            return Err(SearchError::InvalidArgument(format!(
                "invalid document id {document_id}"
            )));
        }
        let words = self.split_into_words_no_stop(text)?;

        let word_freqs = self.id_to_word_freqs.entry(document_id).or_default();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in words {
                *word_freqs.entry(word.clone()).or_insert(0.0) += inv_word_count;
                *self
                    .word_to_document_freqs
                    .access(word)
                    .entry(document_id)
                    .or_insert(0.0) += inv_word_count;
            }
        }
        self.documents.insert(
            document_id,
            DocumentData {
                rating: average_rating(ratings),
                status,
            },
        );
        self.document_ids.push(document_id);
        Ok(())
    }

    /// Ranks documents with `Actual` status against the query.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Ranks documents whose status equals `status`.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, |_, document_status, _| document_status == status)
    }

    /// Ranks documents accepted by `predicate` against the query:
    /// TF-IDF relevance descending, rating descending when relevances
    /// sit within [`RELEVANCE_EPSILON`], ascending id as the final
    /// key. At most [`MAX_RESULT_COUNT`] results.
    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let parsed = query::parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&parsed, predicate);

        matched.sort_by(|lhs, rhs| {
            if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
                rhs.rating
                    .cmp(&lhs.rating)
                    .then_with(|| lhs.id.cmp(&rhs.id))
            } else {
                rhs.relevance.total_cmp(&lhs.relevance)
            }
        });
        matched.truncate(MAX_RESULT_COUNT);
        Ok(matched)
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        // A query without required words has no candidates, minus
        // words or not.
        if query.plus_words.is_empty() {
            return Vec::new();
        }

        let mut document_to_relevance: HashMap<DocumentId, f64> = HashMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(word.as_str()) else {
                continue;
            };
            if postings.is_empty() {
                continue;
            }
            let idf = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings.iter() {
                let data = &self.documents[&document_id];
                if predicate(document_id, data.status, data.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.word_to_document_freqs.get(word.as_str()) else {
                continue;
            };
            for document_id in postings.keys() {
                document_to_relevance.remove(document_id);
            }
        }

        document_to_relevance
            .into_iter()
            .map(|(id, relevance)| Document {
                id,
                relevance,
                rating: self.documents[&id].rating,
            })
            .collect()
    }

    fn inverse_document_freq(&self, documents_containing_word: usize) -> f64 {
        (self.documents.len() as f64 / documents_containing_word as f64).ln()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Id of the document at `index` in insertion order.
    pub fn document_id_at(&self, index: usize) -> Result<DocumentId> {
        self.document_ids
            .get(index)
            .copied()
            .ok_or_else(|| SearchError::OutOfRange(format!("document index {index} out of range")))
    }

    /// Known document ids in the order they were added.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DocumentId>> {
        self.document_ids.iter().copied()
    }

    /// Word -> term frequency for the document, owned. Empty when the
    /// id is unknown; a benign outcome, not an error.
    pub fn get_word_frequencies(&self, document_id: DocumentId) -> HashMap<String, f64> {
        self.id_to_word_freqs
            .get(&document_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Plus words of the query present in the document, in ascending
    /// word order, plus the document's status. Any minus word present
    /// in the document empties the word list.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, document_id)
    }

    /// [`match_document`](Self::match_document) with an explicit
    /// execution policy. Both policies return the same word list; the
    /// parallel one distributes the membership checks over the pool.
    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let Some(data) = self.documents.get(&document_id) else {
            return Err(SearchError::OutOfRange(format!(
                "unknown document id {document_id}"
            )));
        };
        let query = query::parse_query(raw_query, &self.stop_words)?;

        let excluded = match policy {
            ExecutionPolicy::Sequential => query
                .minus_words
                .iter()
                .any(|word| self.document_contains(word, document_id)),
            ExecutionPolicy::Parallel => query
                .minus_words
                .par_iter()
                .any(|word| self.document_contains(word, document_id)),
        };
        if excluded {
            return Ok((Vec::new(), data.status));
        }

        // Plus words live in an ordered set and rayon's collect keeps
        // the source order, so both arms produce identical lists.
        let matched: Vec<String> = match policy {
            ExecutionPolicy::Sequential => query
                .plus_words
                .iter()
                .filter(|word| self.document_contains(word, document_id))
                .cloned()
                .collect(),
            ExecutionPolicy::Parallel => {
                let words: Vec<&String> = query.plus_words.iter().collect();
                words
                    .par_iter()
                    .filter(|word| self.document_contains(word, document_id))
                    .map(|word| (*word).clone())
                    .collect()
            }
        };
        Ok((matched, data.status))
    }

    fn document_contains(&self, word: &str, document_id: DocumentId) -> bool {
        self.word_to_document_freqs
            .get(word)
            .is_some_and(|postings| postings.contains_key(&document_id))
    }

    /// Erases every index entry the document contributed. Unknown ids
    /// are a no-op. Cost is proportional to the number of distinct
    /// words the document carried.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, document_id);
    }

    /// [`remove_document`](Self::remove_document) with an explicit
    /// execution policy. The parallel policy distributes the per-word
    /// posting erases over the pool; the sharded index makes that safe.
    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, document_id: DocumentId) {
        let Some(word_freqs) = self.id_to_word_freqs.remove(&document_id) else {
            return;
        };
        match policy {
            ExecutionPolicy::Sequential => {
                for word in word_freqs.keys() {
                    self.erase_posting(word, document_id);
                }
            }
            ExecutionPolicy::Parallel => {
                word_freqs
                    .par_iter()
                    .for_each(|(word, _)| self.erase_posting(word, document_id));
            }
        }
        self.documents.remove(&document_id);
        self.document_ids.retain(|&id| id != document_id);
    }

    /// Removes a batch of documents. Under the parallel policy the
    /// per-word erases of the whole batch share one worker pool, so
    /// postings of different documents are dropped concurrently.
    pub fn remove_documents(&mut self, policy: ExecutionPolicy, document_ids: &[DocumentId]) {
        match policy {
            ExecutionPolicy::Sequential => {
                for &document_id in document_ids {
                    self.remove_document(document_id);
                }
            }
            ExecutionPolicy::Parallel => {
                let mut detached: Vec<(DocumentId, HashMap<String, f64>)> = Vec::new();
                for &document_id in document_ids {
                    if let Some(word_freqs) = self.id_to_word_freqs.remove(&document_id) {
                        detached.push((document_id, word_freqs));
                    }
                }
                detached.par_iter().for_each(|(document_id, word_freqs)| {
                    for word in word_freqs.keys() {
                        self.erase_posting(word, *document_id);
                    }
                });
                let removed: HashSet<DocumentId> =
                    detached.iter().map(|(document_id, _)| *document_id).collect();
                for document_id in &removed {
                    self.documents.remove(document_id);
                }
                self.document_ids.retain(|id| !removed.contains(id));
            }
        }
    }

    fn erase_posting(&self, word: &str, document_id: DocumentId) {
        let emptied = match self.word_to_document_freqs.get(word) {
            Some(mut postings) => {
                postings.remove(&document_id);
                postings.is_empty()
            }
            None => false,
        };
        if emptied {
            // The shard lock was released with the guard; erase takes
            // it again. Nothing inserts concurrently with removal, so
            // the entry is still empty here.
            self.word_to_document_freqs.erase(word);
        }
    }

    fn split_into_words_no_stop(&self, text: &str) -> Result<Vec<String>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "word {word:?} is invalid"
                )));
            }
            if !self.stop_words.contains(word) {
                words.push(word.to_string());
            }
        }
        Ok(words)
    }
}

impl<'a> IntoIterator for &'a SearchIndex {
    type Item = DocumentId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DocumentId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    (sum / ratings.len() as i64) as i32
}
