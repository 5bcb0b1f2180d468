use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::{char_len, word_tokens};

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。？！]+").expect("sentence end pattern"));

/// Basic size statistics of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub char_count: usize,
    pub char_count_no_space: usize,
    pub word_count: usize,
    /// Runs of sentence terminators; at least 1.
    pub sentence_count: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            char_count: char_len(text),
            char_count_no_space: text.chars().filter(|c| !c.is_whitespace()).count(),
            word_count: word_tokens(text).len(),
            sentence_count: SENTENCE_END.find_iter(text).count().max(1),
        }
    }
}
