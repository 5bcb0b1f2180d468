use serde_json::json;
use translation_eval_core::{ChrfConfig, MetricCalculator, MetricId, Result, TextPair};

use super::{clipped_matches, count_ngrams, MetricOutput};
use crate::round_to;
use crate::tokenizer::char_stream;

/// Character n-gram F-score.
#[derive(Debug, Clone)]
pub struct ChrfCalculator {
    pub max_order: usize,
    /// Recall is weighted `beta` times as much as precision.
    pub beta: f64,
}

impl ChrfCalculator {
    pub fn new(max_order: usize, beta: f64) -> Self {
        Self { max_order, beta }
    }

    pub fn from_config(config: &ChrfConfig) -> Self {
        Self::new(config.max_order, config.beta)
    }

    /// Average precision and recall over the orders where both sides have
    /// n-grams, and the number of such orders.
    fn averaged_precision_recall(&self, reference: &[char], candidate: &[char]) -> (f64, f64, usize) {
        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut orders = 0;

        for order in 1..=self.max_order {
            let ref_counts = count_ngrams(reference, order);
            let cand_counts = count_ngrams(candidate, order);

            let (matches, cand_total) = clipped_matches(&cand_counts, &ref_counts);
            let ref_total: usize = ref_counts.values().sum();

            if cand_total == 0 || ref_total == 0 {
                continue;
            }

            precision_sum += matches as f64 / cand_total as f64;
            recall_sum += matches as f64 / ref_total as f64;
            orders += 1;
        }

        if orders == 0 {
            return (0.0, 0.0, 0);
        }
        (precision_sum / orders as f64, recall_sum / orders as f64, orders)
    }

    /// chrF on a 0-100 scale, 2 decimals.
    pub fn calculate_chrf(&self, reference: &str, candidate: &str) -> f64 {
        let ref_chars = char_stream(reference);
        let cand_chars = char_stream(candidate);

        let (precision, recall, orders) = self.averaged_precision_recall(&ref_chars, &cand_chars);
        if orders == 0 || precision + recall == 0.0 {
            return 0.0;
        }

        let beta_sq = self.beta * self.beta;
        let denominator = beta_sq * precision + recall;
        if denominator == 0.0 {
            return 0.0;
        }

        let f_score = (1.0 + beta_sq) * precision * recall / denominator;
        round_to(f_score * 100.0, 2)
    }
}

impl Default for ChrfCalculator {
    fn default() -> Self {
        Self::from_config(&ChrfConfig::default())
    }
}

impl MetricCalculator for ChrfCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let reference = input.require_reference(MetricId::ChrF)?;

        Ok(MetricOutput {
            metric: MetricId::ChrF,
            score: self.calculate_chrf(reference, &input.candidate),
            metadata: json!({
                "metric": "chrf",
                "max_order": self.max_order,
                "beta": self.beta,
            }),
        })
    }
}
