pub mod bleu;
pub mod chrf;
pub mod meteor;
pub mod error_rate;
pub mod overlap;
pub mod reference_free;
pub mod text_stats;

pub use bleu::*;
pub use chrf::*;
pub use meteor::*;
pub use error_rate::*;
pub use overlap::*;
pub use reference_free::*;
pub use text_stats::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use translation_eval_core::MetricId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricOutput {
    pub metric: MetricId,
    pub score: f64,
    pub metadata: serde_json::Value,
}

/// Count every contiguous n-gram of `items`.
pub(crate) fn count_ngrams<T: Eq + Hash>(items: &[T], n: usize) -> HashMap<&[T], usize> {
    let mut counts = HashMap::new();
    if n == 0 || items.len() < n {
        return counts;
    }
    for window in items.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped matches and total candidate n-grams: each candidate n-gram counts
/// at most as often as it occurs in the reference.
pub(crate) fn clipped_matches<'a, T: Eq + Hash>(
    candidate: &HashMap<&'a [T], usize>,
    reference: &HashMap<&'a [T], usize>,
) -> (usize, usize) {
    candidate
        .iter()
        .fold((0, 0), |(matches, total), (ngram, count)| {
            let clipped = reference.get(ngram).map_or(0, |r| (*count).min(*r));
            (matches + clipped, total + count)
        })
}
