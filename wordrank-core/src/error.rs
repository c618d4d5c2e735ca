use thiserror::Error;

/// Failure taxonomy of the engine. Validation errors surface eagerly
/// at the add/parse boundary and commit no partial state; callers
/// branch on the kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Bad document id, or a word rejected by validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Positional index or document id not present in the store.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
