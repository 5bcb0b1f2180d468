//! Heuristics that need only the source text, never a reference translation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use translation_eval_core::{MetricCalculator, MetricId, Result, TextPair};

use super::MetricOutput;
use crate::round_to;
use crate::tokenizer::{long_word_tokens, word_tokens};

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").expect("number pattern"));

// ===== Repetition =====

/// Share of word n-gram windows that repeat an earlier window.
#[derive(Debug, Clone)]
pub struct RepetitionCalculator {
    pub ngram: usize,
}

impl RepetitionCalculator {
    pub fn new(ngram: usize) -> Self {
        Self { ngram: ngram.max(1) }
    }

    /// Percent, 2 decimals. Texts shorter than two windows score 0.
    pub fn calculate_repetition(&self, text: &str) -> f64 {
        let words = word_tokens(text);
        if words.len() < self.ngram * 2 {
            return 0.0;
        }

        let mut seen: HashSet<&[String]> = HashSet::new();
        let mut total = 0usize;
        let mut repeated = 0usize;

        for window in words.windows(self.ngram) {
            if !seen.insert(window) {
                repeated += 1;
            }
            total += 1;
        }

        round_to(repeated as f64 / total as f64 * 100.0, 2)
    }
}

impl Default for RepetitionCalculator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl MetricCalculator for RepetitionCalculator {
    type Input = str;
    type Output = MetricOutput;

    fn calculate(&self, input: &str) -> Result<MetricOutput> {
        Ok(MetricOutput {
            metric: MetricId::Repetition,
            score: self.calculate_repetition(input),
            metadata: json!({
                "metric": "repetition",
                "ngram": self.ngram,
            }),
        })
    }
}

// ===== Number Preservation =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberPreservation {
    /// Percent of source numbers found in the candidate, 1 decimal.
    pub preserved: f64,
    /// Source numbers with no counterpart in the candidate.
    pub missing: usize,
    /// Candidate numbers left over after matching.
    pub extra: usize,
}

/// Multiset comparison of the decimal numbers in source and candidate.
/// A comma decimal separator is read as a dot.
#[derive(Debug, Clone, Default)]
pub struct NumberPreservationCalculator;

impl NumberPreservationCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_numbers(text: &str) -> Vec<String> {
        NUMBER
            .find_iter(text)
            .map(|m| m.as_str().replacen(',', ".", 1))
            .collect()
    }

    pub fn calculate_preservation(&self, source: &str, candidate: &str) -> NumberPreservation {
        let source_numbers = Self::extract_numbers(source);
        let mut pool = Self::extract_numbers(candidate);

        if source_numbers.is_empty() {
            return NumberPreservation {
                preserved: 100.0,
                missing: 0,
                extra: pool.len(),
            };
        }

        let mut preserved = 0usize;
        for number in &source_numbers {
            if let Some(idx) = pool.iter().position(|candidate| candidate == number) {
                pool.remove(idx);
                preserved += 1;
            }
        }

        NumberPreservation {
            preserved: round_to(preserved as f64 / source_numbers.len() as f64 * 100.0, 1),
            missing: source_numbers.len() - preserved,
            extra: pool.len(),
        }
    }
}

impl MetricCalculator for NumberPreservationCalculator {
    type Input = TextPair;
    type Output = NumberPreservation;

    fn calculate(&self, input: &TextPair) -> Result<NumberPreservation> {
        let source = input.require_reference(MetricId::NumberPreservation)?;
        Ok(self.calculate_preservation(source, &input.candidate))
    }
}

// ===== Copy Rate =====

/// Share of candidate words (of at least `min_token_chars` characters) that
/// also occur in the source.
#[derive(Debug, Clone)]
pub struct CopyRateCalculator {
    pub min_token_chars: usize,
}

impl CopyRateCalculator {
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    /// Percent, 2 decimals. An empty candidate scores 0.
    pub fn calculate_copy_rate(&self, source: &str, candidate: &str) -> f64 {
        let source_words: HashSet<String> = long_word_tokens(source, self.min_token_chars)
            .into_iter()
            .collect();
        let candidate_words = long_word_tokens(candidate, self.min_token_chars);

        if candidate_words.is_empty() {
            return 0.0;
        }

        let copied = candidate_words
            .iter()
            .filter(|word| source_words.contains(*word))
            .count();
        round_to(copied as f64 / candidate_words.len() as f64 * 100.0, 2)
    }
}

impl Default for CopyRateCalculator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl MetricCalculator for CopyRateCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let source = input.require_reference(MetricId::CopyRate)?;

        Ok(MetricOutput {
            metric: MetricId::CopyRate,
            score: self.calculate_copy_rate(source, &input.candidate),
            metadata: json!({
                "metric": "copy_rate",
                "min_token_chars": self.min_token_chars,
            }),
        })
    }
}
