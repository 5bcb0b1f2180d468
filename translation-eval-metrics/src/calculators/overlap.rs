use serde_json::json;
use std::collections::HashSet;
use translation_eval_core::{MetricCalculator, MetricId, Result, TextPair};

use super::MetricOutput;
use crate::round_to;
use crate::tokenizer::{char_len, word_tokens};

/// Word-set Jaccard overlap.
#[derive(Debug, Clone, Default)]
pub struct JaccardCalculator;

impl JaccardCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `|A ∩ B| / |A ∪ B|` in percent, 2 decimals. Two empty sets agree fully.
    pub fn calculate_jaccard(&self, reference: &str, candidate: &str) -> f64 {
        let ref_words: HashSet<String> = word_tokens(reference).into_iter().collect();
        let cand_words: HashSet<String> = word_tokens(candidate).into_iter().collect();

        if ref_words.is_empty() && cand_words.is_empty() {
            return 100.0;
        }

        let intersection = ref_words.intersection(&cand_words).count();
        let union = ref_words.union(&cand_words).count();
        round_to(intersection as f64 / union as f64 * 100.0, 2)
    }
}

impl MetricCalculator for JaccardCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let reference = input.require_reference(MetricId::Jaccard)?;

        Ok(MetricOutput {
            metric: MetricId::Jaccard,
            score: self.calculate_jaccard(reference, &input.candidate),
            metadata: json!({ "metric": "jaccard" }),
        })
    }
}

/// Candidate length relative to the reference (or source) in characters.
#[derive(Debug, Clone, Default)]
pub struct LengthRatioCalculator;

impl LengthRatioCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Percent, 2 decimals. An empty denominator yields 100.
    pub fn calculate_ratio(&self, reference: &str, candidate: &str) -> f64 {
        let reference_len = char_len(reference);
        if reference_len == 0 {
            return 100.0;
        }
        round_to(char_len(candidate) as f64 / reference_len as f64 * 100.0, 2)
    }
}

impl MetricCalculator for LengthRatioCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let reference = input.require_reference(MetricId::LengthRatio)?;

        Ok(MetricOutput {
            metric: MetricId::LengthRatio,
            score: self.calculate_ratio(reference, &input.candidate),
            metadata: json!({
                "metric": "length_ratio",
                "reference_chars": char_len(reference),
                "candidate_chars": char_len(&input.candidate),
            }),
        })
    }
}
