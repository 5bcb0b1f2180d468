//! Shared normalisation used by every metric.
//!
//! Word tokens are lowercase runs of Unicode letters, digits and underscores.
//! The character stream is the lowercased text with whitespace runs collapsed
//! to a single space.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Lowercase word tokens in order of appearance.
pub fn word_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Word tokens with at least `min_chars` characters.
pub fn long_word_tokens(text: &str, min_chars: usize) -> Vec<String> {
    word_tokens(text)
        .into_iter()
        .filter(|token| token.chars().count() >= min_chars)
        .collect()
}

/// Normalised character stream for character n-gram metrics.
pub fn char_stream(text: &str) -> Vec<char> {
    let lowered = text.to_lowercase();
    WHITESPACE.replace_all(&lowered, " ").chars().collect()
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokens_strip_punctuation() {
        assert_eq!(word_tokens("Hello, World! it's"), vec!["hello", "world", "it", "s"]);
    }

    #[test]
    fn test_word_tokens_unicode() {
        assert_eq!(word_tokens("Привет Мир"), vec!["привет", "мир"]);
        assert_eq!(word_tokens("Größe"), vec!["größe"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(word_tokens("").is_empty());
        assert!(word_tokens("  ... !!").is_empty());
        assert!(char_stream("").is_empty());
    }

    #[test]
    fn test_char_stream_collapses_whitespace() {
        let stream: String = char_stream("A  b\t\nC").into_iter().collect();
        assert_eq!(stream, "a b c");
    }

    #[test]
    fn test_long_word_tokens() {
        assert_eq!(long_word_tokens("a an the cats", 3), vec!["the", "cats"]);
    }
}
