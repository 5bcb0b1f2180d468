use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use validator::Validate;

use super::metric::{MetricId, MetricSet, MetricValue};

/// BERTScore triple on a 0-100 scale, as returned by the neural backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BertScore {
    #[serde(default)]
    pub precision: MetricValue,
    #[serde(default)]
    pub recall: MetricValue,
    #[serde(default)]
    pub f1: MetricValue,
}

/// Scores from an LLM judge on a 1-10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmJudgement {
    #[serde(default, alias = "score")]
    pub overall: MetricValue,
    #[serde(default)]
    pub fluency: MetricValue,
    #[serde(default)]
    pub adequacy: MetricValue,
    #[serde(default)]
    pub feedback: String,
}

/// Externally computed scores for one (pair, model) observation.
///
/// COMET and COMET-QE are raw 0-1 model outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalScores {
    #[serde(default, alias = "bertScore")]
    pub bert_score: Option<BertScore>,
    #[serde(default)]
    pub comet: MetricValue,
    #[serde(default, alias = "cometQE")]
    pub comet_qe: MetricValue,
    #[serde(default)]
    pub llm: Option<LlmJudgement>,
}

impl ExternalScores {
    pub fn with_bert_score(mut self, f1: f64) -> Self {
        self.bert_score = Some(BertScore {
            precision: MetricValue::Unavailable,
            recall: MetricValue::Unavailable,
            f1: MetricValue::from_f64(f1),
        });
        self
    }

    pub fn with_comet(mut self, comet: f64) -> Self {
        self.comet = MetricValue::from_f64(comet);
        self
    }

    pub fn with_comet_qe(mut self, comet_qe: f64) -> Self {
        self.comet_qe = MetricValue::from_f64(comet_qe);
        self
    }

    pub fn with_llm_score(mut self, overall: f64) -> Self {
        let judgement = self.llm.get_or_insert_with(LlmJudgement::default);
        judgement.overall = MetricValue::from_f64(overall);
        self
    }

    pub fn bert_f1(&self) -> MetricValue {
        self.bert_score
            .as_ref()
            .map(|score| score.f1.clone())
            .unwrap_or_default()
    }
}

/// One (pair, model) observation fed to batch statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EvaluationRecord {
    #[validate(length(min = 1, max = 255))]
    pub model: String,
    /// Keys that name no known metric are dropped on input.
    #[serde(default, deserialize_with = "deserialize_known_metrics")]
    pub metrics: MetricSet,
    /// Elapsed wall-clock time in milliseconds.
    #[serde(default, alias = "time")]
    pub time_ms: MetricValue,
    /// Spend in cents.
    #[serde(default, alias = "cost")]
    pub cost_cents: MetricValue,
}

impl EvaluationRecord {
    pub fn new(model: impl Into<String>, metrics: MetricSet) -> Self {
        Self {
            model: model.into(),
            metrics,
            time_ms: MetricValue::Unavailable,
            cost_cents: MetricValue::Unavailable,
        }
    }

    pub fn with_time_ms(mut self, time_ms: f64) -> Self {
        self.time_ms = MetricValue::from_f64(time_ms);
        self
    }

    pub fn with_cost_cents(mut self, cost_cents: f64) -> Self {
        self.cost_cents = MetricValue::from_f64(cost_cents);
        self
    }

    pub fn metric(&self, metric: MetricId) -> MetricValue {
        self.metrics.get(&metric).cloned().unwrap_or_default()
    }
}

fn deserialize_known_metrics<'de, D>(deserializer: D) -> Result<MetricSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, MetricValue>::deserialize(deserializer)?;
    let mut metrics = MetricSet::new();

    for (key, value) in raw {
        match key.parse::<MetricId>() {
            Ok(metric) => {
                metrics.insert(metric, value);
            }
            Err(_) => debug!("Ignoring untracked metric '{}'", key),
        }
    }

    Ok(metrics)
}
