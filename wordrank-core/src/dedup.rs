use std::collections::{BTreeSet, HashSet};

use crate::document::DocumentId;
use crate::index::SearchIndex;

/// Removes every document whose word set (frequencies ignored) exactly
/// matches the word set of an earlier-inserted document, keeping the
/// earliest copy. Returns the removed ids in traversal order.
pub fn remove_duplicates(index: &mut SearchIndex) -> Vec<DocumentId> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = Vec::new();
    for document_id in index.iter() {
        let words: BTreeSet<String> = index
            .get_word_frequencies(document_id)
            .into_keys()
            .collect();
        if !seen.insert(words) {
            duplicates.push(document_id);
        }
    }

    for &document_id in &duplicates {
        tracing::debug!(document_id, "removing duplicate document");
        index.remove_document(document_id);
    }
    duplicates
}
