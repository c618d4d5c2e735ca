/// Splits text on whitespace. Yielded tokens are never empty.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// A word is valid when it contains no control characters below 0x20.
pub fn is_valid_word(word: &str) -> bool {
    word.chars().all(|c| c as u32 >= 0x20)
}
