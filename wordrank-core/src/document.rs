use serde::{Deserialize, Serialize};
use std::fmt;

/// Documents are keyed by a signed integer so a caller-supplied
/// negative id can be rejected instead of silently wrapping.
pub type DocumentId = i32;

/// Caller-supplied lifecycle classification. The engine stores it at
/// add time and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// One ranked search result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}
