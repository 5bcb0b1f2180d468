use serde::{Deserialize, Serialize};
use serde_json::json;
use translation_eval_core::{MetricCalculator, MetricId, Result, TextPair};

use super::MetricOutput;
use crate::edit_distance::levenshtein;
use crate::round_to;
use crate::tokenizer::word_tokens;

/// Ceiling on CER/WER so degenerate pairs cannot swamp an aggregate.
pub const MAX_ERROR_RATE: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorUnit {
    /// Raw characters, case preserved.
    Character,
    /// Lowercase word tokens.
    Word,
}

/// Edit-distance error rate: CER over characters, WER over words.
#[derive(Debug, Clone)]
pub struct ErrorRateCalculator {
    pub unit: ErrorUnit,
}

impl ErrorRateCalculator {
    pub fn new(unit: ErrorUnit) -> Self {
        Self { unit }
    }

    pub fn cer() -> Self {
        Self::new(ErrorUnit::Character)
    }

    pub fn wer() -> Self {
        Self::new(ErrorUnit::Word)
    }

    pub fn metric(&self) -> MetricId {
        match self.unit {
            ErrorUnit::Character => MetricId::Cer,
            ErrorUnit::Word => MetricId::Wer,
        }
    }

    fn rate(distance: usize, reference_len: usize) -> f64 {
        if reference_len == 0 {
            return 0.0;
        }
        let rate = (distance as f64 / reference_len as f64 * 100.0).min(MAX_ERROR_RATE);
        round_to(rate, 2)
    }

    /// Error rate in percent, 2 decimals. An empty reference scores 0.
    pub fn calculate_rate(&self, reference: &str, candidate: &str) -> f64 {
        match self.unit {
            ErrorUnit::Character => {
                let ref_chars: Vec<char> = reference.chars().collect();
                let cand_chars: Vec<char> = candidate.chars().collect();
                Self::rate(levenshtein(&ref_chars, &cand_chars), ref_chars.len())
            }
            ErrorUnit::Word => {
                let ref_words = word_tokens(reference);
                let cand_words = word_tokens(candidate);
                Self::rate(levenshtein(&ref_words, &cand_words), ref_words.len())
            }
        }
    }
}

impl MetricCalculator for ErrorRateCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let metric = self.metric();
        let reference = input.require_reference(metric)?;

        Ok(MetricOutput {
            metric,
            score: self.calculate_rate(reference, &input.candidate),
            metadata: json!({
                "metric": metric.key(),
                "unit": self.unit,
            }),
        })
    }
}
