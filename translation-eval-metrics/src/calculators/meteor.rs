use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use translation_eval_core::{MetricCalculator, MetricId, Result, TextPair};

use super::MetricOutput;
use crate::round_to;
use crate::synonyms::{SynonymMap, SynonymTable};
use crate::tokenizer::word_tokens;

/// Greedy two-pass alignment between candidate and reference tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeteorAlignment {
    pub matches: usize,
    pub chunks: usize,
    pub precision: f64,
    pub recall: f64,
    pub f_mean: f64,
    pub fragmentation_penalty: f64,
}

/// METEOR with exact and synonym matching.
///
/// The alignment is the greedy nested scan, not an optimal bipartite
/// matching: candidate tokens are visited left to right and each takes the
/// first free reference token that qualifies. Changing the strategy changes
/// scores.
#[derive(Debug, Clone)]
pub struct MeteorCalculator {
    synonyms: Arc<SynonymMap>,
}

impl MeteorCalculator {
    pub fn new(synonyms: Arc<SynonymMap>) -> Self {
        Self { synonyms }
    }

    pub fn for_language(table: &SynonymTable, language: &str) -> Self {
        Self::new(Arc::new(table.resolve(language)))
    }

    /// Exact pass then synonym pass; returns, per candidate token, the index
    /// of the reference token it was aligned to.
    fn align_tokens(&self, reference: &[String], candidate: &[String]) -> Vec<Option<usize>> {
        let mut ref_matched = vec![false; reference.len()];
        let mut alignment: Vec<Option<usize>> = vec![None; candidate.len()];

        for (c_idx, c_token) in candidate.iter().enumerate() {
            for (r_idx, r_token) in reference.iter().enumerate() {
                if !ref_matched[r_idx] && alignment[c_idx].is_none() && c_token == r_token {
                    ref_matched[r_idx] = true;
                    alignment[c_idx] = Some(r_idx);
                }
            }
        }

        for (c_idx, c_token) in candidate.iter().enumerate() {
            if alignment[c_idx].is_some() {
                continue;
            }
            for (r_idx, r_token) in reference.iter().enumerate() {
                if !ref_matched[r_idx]
                    && alignment[c_idx].is_none()
                    && self.synonyms.are_synonyms(c_token, r_token)
                {
                    ref_matched[r_idx] = true;
                    alignment[c_idx] = Some(r_idx);
                }
            }
        }

        alignment
    }

    /// Maximal runs of matches, taken in candidate order, whose reference
    /// positions are consecutive. Unmatched candidate tokens do not break a run.
    fn count_chunks(alignment: &[Option<usize>]) -> usize {
        let mut chunks = 0;
        let mut previous: Option<usize> = None;

        for r_idx in alignment.iter().flatten() {
            if previous.map_or(true, |p| *r_idx != p + 1) {
                chunks += 1;
            }
            previous = Some(*r_idx);
        }
        chunks
    }

    pub fn align(&self, reference: &str, candidate: &str) -> MeteorAlignment {
        let ref_tokens = word_tokens(reference);
        let cand_tokens = word_tokens(candidate);

        if ref_tokens.is_empty() || cand_tokens.is_empty() {
            return MeteorAlignment::default();
        }

        let alignment = self.align_tokens(&ref_tokens, &cand_tokens);
        let matches = alignment.iter().filter(|a| a.is_some()).count();
        if matches == 0 {
            return MeteorAlignment::default();
        }

        let precision = matches as f64 / cand_tokens.len() as f64;
        let recall = matches as f64 / ref_tokens.len() as f64;
        let f_mean = 10.0 * precision * recall / (9.0 * precision + recall);

        let chunks = Self::count_chunks(&alignment);
        let fragmentation_penalty = 0.5 * (chunks as f64 / matches as f64).powi(3);

        MeteorAlignment {
            matches,
            chunks,
            precision,
            recall,
            f_mean,
            fragmentation_penalty,
        }
    }

    fn score(alignment: &MeteorAlignment) -> f64 {
        if alignment.matches == 0 {
            return 0.0;
        }
        round_to(
            alignment.f_mean * (1.0 - alignment.fragmentation_penalty) * 100.0,
            2,
        )
    }

    /// METEOR on a 0-100 scale, 2 decimals.
    pub fn calculate_meteor(&self, reference: &str, candidate: &str) -> f64 {
        Self::score(&self.align(reference, candidate))
    }
}

impl Default for MeteorCalculator {
    fn default() -> Self {
        Self::for_language(&SynonymTable::builtin(), translation_eval_core::DEFAULT_LANGUAGE)
    }
}

impl MetricCalculator for MeteorCalculator {
    type Input = TextPair;
    type Output = MetricOutput;

    fn calculate(&self, input: &TextPair) -> Result<MetricOutput> {
        let reference = input.require_reference(MetricId::Meteor)?;
        let alignment = self.align(reference, &input.candidate);

        Ok(MetricOutput {
            metric: MetricId::Meteor,
            score: Self::score(&alignment),
            metadata: json!({
                "metric": "meteor",
                "matches": alignment.matches,
                "chunks": alignment.chunks,
            }),
        })
    }
}
