use serde_json::json;
use translation_eval_core::{MetricCalculator, MetricId, Result, TextPair};

use super::{clipped_matches, count_ngrams, MetricOutput};
use crate::round_to;
use crate::tokenizer::word_tokens;

/// Added to every precision before taking the log so a missing order
/// drives the score towards zero instead of to `-inf`.
const LOG_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct BleuCalculator {
    pub max_n: usize,
}

impl BleuCalculator {
    pub fn new(max_n: usize) -> Self {
        Self { max_n: max_n.max(1) }
    }

    /// Clipped n-gram precision; 0 when the candidate has no n-grams of this order.
    fn modified_precision(&self, reference: &[String], candidate: &[String], n: usize) -> f64 {
        let ref_counts = count_ngrams(reference, n);
        let cand_counts = count_ngrams(candidate, n);

        let (matches, total) = clipped_matches(&cand_counts, &ref_counts);
        if total == 0 {
            return 0.0;
        }
        matches as f64 / total as f64
    }

    fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
        (1.0 - reference_len as f64 / candidate_len as f64).exp().min(1.0)
    }

    /// BLEU on a 0-100 scale (2 decimals) plus the per-order precisions.
    pub fn calculate_bleu(&self, reference: &str, candidate: &str) -> (f64, Vec<f64>) {
        let ref_tokens = word_tokens(reference);
        let cand_tokens = word_tokens(candidate);

        if cand_tokens.is_empty() {
            return (0.0, vec![0.0; self.max_n]);
        }

        let precisions: Vec<f64> = (1..=self.max_n)
            .map(|n| self.modified_precision(&ref_tokens, &cand_tokens, n))
            .collect();

        let log_sum: f64 = precisions.iter().map(|p| (p + LOG_EPSILON).ln()).sum();
        let geometric_mean = (log_sum / self.max_n as f64).exp();
        let bp = Self::brevity_penalty(cand_tokens.len(), ref_tokens.len());

        (round_to(geometric_mean * bp * 100.0, 2), precisions)
    }
}

impl Default for BleuCalculator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl MetricCalculator for BleuCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let reference = input.require_reference(MetricId::Bleu)?;
        let (score, precisions) = self.calculate_bleu(reference, &input.candidate);

        Ok(MetricOutput {
            metric: MetricId::Bleu,
            score,
            metadata: json!({
                "metric": "bleu",
                "max_n": self.max_n,
                "precisions": precisions,
            }),
        })
    }
}
