use serde::{Deserialize, Serialize};
use tracing::debug;
use translation_eval_core::{
    MetricId, MetricSet, MetricValue, ReferenceFreeWeights, ReferenceWeights, WeightSet,
};

use crate::round_to;

/// One metric's contribution to a weighted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub metric: MetricId,
    /// Raw metric value; `None` when unavailable or errored.
    pub value: Option<f64>,
    pub weight: f64,
}

/// Combines per-metric values into a single 0-100 total.
///
/// Only metrics with data and a positive weight contribute, to both the
/// weighted sum and the weight total, so a missing metric is excluded
/// rather than counted as zero.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Reference-based total, or `Unavailable` if nothing contributed.
    pub fn reference_based(metrics: &MetricSet, weights: &ReferenceWeights) -> MetricValue {
        Self::total(metrics, weights)
    }

    /// Reference-free total, or `Unavailable` if nothing contributed.
    pub fn reference_free(metrics: &MetricSet, weights: &ReferenceFreeWeights) -> MetricValue {
        Self::total(metrics, weights)
    }

    /// Weighted total over every metric of the weight set, 1 decimal.
    pub fn total<W: WeightSet>(metrics: &MetricSet, weights: &W) -> MetricValue {
        Self::combine(Self::components(metrics, weights))
    }

    /// Pair each metric of the weight set with its value and weight.
    pub fn components<W: WeightSet>(metrics: &MetricSet, weights: &W) -> Vec<ScoreComponent> {
        W::METRICS
            .iter()
            .map(|&metric| ScoreComponent {
                metric,
                value: metrics.get(&metric).and_then(MetricValue::value),
                weight: weights.weight(metric),
            })
            .collect()
    }

    /// The shared aggregation step.
    pub fn combine(components: impl IntoIterator<Item = ScoreComponent>) -> MetricValue {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for component in components {
            if component.weight.is_nan() || component.weight <= 0.0 {
                continue;
            }
            let Some(value) = component.value else {
                debug!("Skipping unavailable metric {} in total", component.metric);
                continue;
            };

            weighted_sum += Self::transform(component.metric, value) * component.weight;
            total_weight += component.weight;
        }

        if total_weight == 0.0 {
            return MetricValue::Unavailable;
        }

        MetricValue::from_f64(round_to(weighted_sum / total_weight, 1))
    }

    /// Map a raw metric value onto the 0-100 "higher is better" scale used
    /// for weighting.
    pub fn transform(metric: MetricId, value: f64) -> f64 {
        match metric {
            MetricId::Cer | MetricId::Wer | MetricId::Repetition => (100.0 - value).max(0.0),
            MetricId::LengthRatio => Self::length_ratio_score(value),
            MetricId::Comet | MetricId::CometQe => value * 100.0,
            MetricId::CopyRate => Self::copy_rate_score(value),
            MetricId::LlmScore | MetricId::Fluency | MetricId::Adequacy => {
                Self::judge_score(value)
            }
            MetricId::Bleu
            | MetricId::Meteor
            | MetricId::Jaccard
            | MetricId::ChrF
            | MetricId::BertScore
            | MetricId::NumberPreservation
            | MetricId::Total => value,
        }
    }

    /// 100 at an exact length match, two points off per percent of deviation.
    pub fn length_ratio_score(ratio: f64) -> f64 {
        (100.0 - 2.0 * (ratio - 100.0).abs()).max(0.0)
    }

    /// Near-zero copying hints at an incomplete translation, 5-25% is the
    /// expected band, heavy copying is penalised.
    pub fn copy_rate_score(copy_rate: f64) -> f64 {
        if copy_rate < 5.0 {
            70.0 + copy_rate * 6.0
        } else if copy_rate <= 25.0 {
            100.0
        } else {
            (100.0 - (copy_rate - 25.0) * 2.0).max(0.0)
        }
    }

    /// Rescale a 1-10 judge score to 0-100.
    pub fn judge_score(score: f64) -> f64 {
        ((score - 1.0) * 100.0 / 9.0).clamp(0.0, 100.0)
    }
}
