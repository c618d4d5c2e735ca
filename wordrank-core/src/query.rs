use std::collections::{BTreeSet, HashSet};

use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words};

/// A validated query: required words and forbidden words. The sets are
/// ordered so every consumer walks words in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

struct QueryWord<'a> {
    word: &'a str,
    is_minus: bool,
}

fn parse_query_word(token: &str) -> Result<QueryWord<'_>> {
    let (word, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
        return Err(SearchError::InvalidArgument(format!(
            "query word {token:?} is invalid"
        )));
    }
    Ok(QueryWord { word, is_minus })
}

/// Parses raw query text. Tokens prefixed with a single `-` become
/// minus words. A token that is empty after stripping, keeps a second
/// leading `-`, or carries a control character fails the whole parse.
/// Stop words are dropped from both sets after prefix stripping.
pub fn parse_query(text: &str, stop_words: &HashSet<String>) -> Result<Query> {
    let mut query = Query::default();
    for token in split_into_words(text) {
        let parsed = parse_query_word(token)?;
        if stop_words.contains(parsed.word) {
            continue;
        }
        let words = if parsed.is_minus {
            &mut query.minus_words
        } else {
            &mut query.plus_words
        };
        words.insert(parsed.word.to_string());
    }
    Ok(query)
}
