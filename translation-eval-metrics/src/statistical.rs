use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::info;
use translation_eval_core::{EvaluationRecord, MetricId};

use crate::round_to;

/// Descriptive statistics of one metric for one model, all to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl MetricSummary {
    /// `None` when no finite value remains after filtering.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }

        Some(Self {
            count: values.len(),
            mean: round_to(Statistics::mean(&values), 2),
            min: round_to(Statistics::min(&values), 2),
            max: round_to(Statistics::max(&values), 2),
            std_dev: round_to(Statistics::population_std_dev(&values), 2),
        })
    }
}

/// Elapsed time in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSummary {
    pub count: usize,
    pub total_seconds: f64,
    pub average_seconds: f64,
}

impl TimeSummary {
    pub fn from_millis(values: &[f64]) -> Option<Self> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }

        let total_ms: f64 = values.iter().sum();
        Some(Self {
            count: values.len(),
            total_seconds: round_to(total_ms / 1000.0, 2),
            average_seconds: round_to(total_ms / values.len() as f64 / 1000.0, 2),
        })
    }
}

/// Spend in currency units, 4 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub count: usize,
    pub total: Decimal,
    pub average: Decimal,
}

impl CostSummary {
    const CENTS_PER_UNIT: Decimal = Decimal::ONE_HUNDRED;
    const DECIMALS: u32 = 4;

    pub fn from_cents(values: &[f64]) -> Option<Self> {
        let cents: Vec<Decimal> = values
            .iter()
            .filter_map(|v| Decimal::try_from(*v).ok())
            .collect();
        if cents.is_empty() {
            return None;
        }

        let total_cents: Decimal = cents.iter().sum();
        let count = Decimal::from(cents.len());
        let round = |d: Decimal| {
            d.round_dp_with_strategy(Self::DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        };

        Some(Self {
            count: cents.len(),
            total: round(total_cents / Self::CENTS_PER_UNIT),
            average: round(total_cents / count / Self::CENTS_PER_UNIT),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// Metrics without any valid observation are absent.
    pub metrics: BTreeMap<MetricId, MetricSummary>,
    pub time: Option<TimeSummary>,
    pub cost: Option<CostSummary>,
}

impl ModelStatistics {
    /// Flat export form: `bleu`, `bleu_min`, `bleu_max`, `bleu_std`, ...,
    /// `time`, `time_total`, `cost`, `cost_total`.
    pub fn formatted(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();

        for (metric, summary) in &self.metrics {
            let key = metric.key();
            out.insert(key.to_string(), format!("{:.2}", summary.mean));
            out.insert(format!("{key}_min"), format!("{:.2}", summary.min));
            out.insert(format!("{key}_max"), format!("{:.2}", summary.max));
            out.insert(format!("{key}_std"), format!("{:.2}", summary.std_dev));
        }

        if let Some(time) = &self.time {
            out.insert("time".to_string(), format!("{:.2}", time.average_seconds));
            out.insert("time_total".to_string(), format!("{:.2}", time.total_seconds));
        }

        if let Some(cost) = &self.cost {
            out.insert("cost".to_string(), format!("{:.4}", cost.average));
            out.insert("cost_total".to_string(), format!("{:.4}", cost.total));
        }

        out
    }
}

/// Per-model summaries keyed by model id.
pub type BatchSummary = BTreeMap<String, ModelStatistics>;

#[derive(Debug, Default)]
struct Observations {
    metrics: BTreeMap<MetricId, Vec<f64>>,
    time_ms: Vec<f64>,
    cost_cents: Vec<f64>,
}

pub struct BatchStatistics;

impl BatchStatistics {
    /// Summarise a batch of evaluation records per model.
    ///
    /// Unavailable and errored values are dropped before any statistic is
    /// computed. Returns `None` for an empty batch.
    pub fn summarize(records: &[EvaluationRecord]) -> Option<BatchSummary> {
        if records.is_empty() {
            return None;
        }

        let mut by_model: BTreeMap<&str, Observations> = BTreeMap::new();

        for record in records {
            let observations = by_model.entry(record.model.as_str()).or_default();

            for metric in MetricId::ALL {
                if let Some(value) = record.metric(metric).value().filter(|v| v.is_finite()) {
                    observations.metrics.entry(metric).or_default().push(value);
                }
            }
            if let Some(time) = record.time_ms.value() {
                observations.time_ms.push(time);
            }
            if let Some(cost) = record.cost_cents.value() {
                observations.cost_cents.push(cost);
            }
        }

        let summary: BatchSummary = by_model
            .into_iter()
            .map(|(model, observations)| {
                let metrics = observations
                    .metrics
                    .iter()
                    .filter_map(|(metric, values)| {
                        MetricSummary::from_values(values).map(|s| (*metric, s))
                    })
                    .collect();

                let statistics = ModelStatistics {
                    metrics,
                    time: TimeSummary::from_millis(&observations.time_ms),
                    cost: CostSummary::from_cents(&observations.cost_cents),
                };
                (model.to_string(), statistics)
            })
            .collect();

        info!(
            "Summarized {} evaluation records across {} models",
            records.len(),
            summary.len()
        );

        Some(summary)
    }
}
