use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use translation_eval_core::{
    EngineConfig, EvaluationRecord, ExternalScores, MetricCalculator, MetricId, MetricSet,
    MetricValue, Result, TextPair, TranslationSample,
};

use crate::aggregators::ScoreAggregator;
use crate::calculators::{
    BleuCalculator, ChrfCalculator, CopyRateCalculator, ErrorRateCalculator, JaccardCalculator,
    LengthRatioCalculator, MeteorCalculator, MetricOutput, NumberPreservation,
    NumberPreservationCalculator, RepetitionCalculator, TextStats,
};
use crate::synonyms::SynonymTable;

type PairCalculator = dyn MetricCalculator<Input = TextPair, Output = MetricOutput>;

/// Everything computed for one (sample, model) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEvaluation {
    /// Local and external metrics, plus `Total`.
    pub metrics: MetricSet,
    pub number_preservation: NumberPreservation,
    pub text_stats: TextStats,
    /// `Unavailable` when the sample has no reference.
    pub reference_total: MetricValue,
    pub reference_free_total: MetricValue,
}

impl PairEvaluation {
    pub fn metric(&self, metric: MetricId) -> MetricValue {
        self.metrics.get(&metric).cloned().unwrap_or_default()
    }

    /// Wire key -> fixed-precision text, `"N/A"`/`"Error"` for missing values.
    pub fn formatted(&self) -> BTreeMap<String, String> {
        self.metrics
            .iter()
            .map(|(metric, value)| (metric.key().to_string(), value.format(metric.precision())))
            .collect()
    }

    pub fn into_record(self, model: impl Into<String>) -> EvaluationRecord {
        EvaluationRecord::new(model, self.metrics)
    }
}

/// Runs every local metric over a sample and folds in external scores.
///
/// Holds no mutable state; one evaluator can score pairs from many threads.
pub struct PairEvaluator {
    config: EngineConfig,
    bleu: BleuCalculator,
    meteor: MeteorCalculator,
    chrf: ChrfCalculator,
    cer: ErrorRateCalculator,
    wer: ErrorRateCalculator,
    jaccard: JaccardCalculator,
    length_ratio: LengthRatioCalculator,
    repetition: RepetitionCalculator,
    number_preservation: NumberPreservationCalculator,
    copy_rate: CopyRateCalculator,
}

impl PairEvaluator {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        let synonyms = Arc::new(SynonymTable::from_config(&config).resolve(&config.language));

        debug!(
            "Building pair evaluator for language {} ({} synonym entries)",
            config.language,
            synonyms.len()
        );

        Ok(Self {
            bleu: BleuCalculator::default(),
            meteor: MeteorCalculator::new(synonyms),
            chrf: ChrfCalculator::from_config(&config.chrf),
            cer: ErrorRateCalculator::cer(),
            wer: ErrorRateCalculator::wer(),
            jaccard: JaccardCalculator::new(),
            length_ratio: LengthRatioCalculator::new(),
            repetition: RepetitionCalculator::new(config.repetition_ngram),
            number_preservation: NumberPreservationCalculator::new(),
            copy_rate: CopyRateCalculator::default(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn reference_calculators(&self) -> [&PairCalculator; 7] {
        [
            &self.bleu,
            &self.meteor,
            &self.cer,
            &self.wer,
            &self.jaccard,
            &self.chrf,
            &self.length_ratio,
        ]
    }

    /// Score `candidate` against `sample`.
    ///
    /// Reference-based metrics run only when the sample carries a non-empty
    /// reference. Heuristics always compare the candidate with the source.
    pub fn evaluate(
        &self,
        sample: &TranslationSample,
        candidate: &str,
        external: &ExternalScores,
    ) -> Result<PairEvaluation> {
        let mut metrics = MetricSet::new();
        let source_pair = sample.source_pair(candidate);
        let reference_pair = sample.reference_pair(candidate);

        match &reference_pair {
            Some(pair) => {
                for calculator in self.reference_calculators() {
                    let output = calculator.calculate(pair)?;
                    metrics.insert(output.metric, MetricValue::from_f64(output.score));
                }
            }
            None => {
                debug!("No reference translation; skipping reference-based metrics");
                let output = self.length_ratio.calculate(&source_pair)?;
                metrics.insert(output.metric, MetricValue::from_f64(output.score));
            }
        }

        let repetition = self.repetition.calculate(candidate)?;
        metrics.insert(repetition.metric, MetricValue::from_f64(repetition.score));

        let copy_rate = self.copy_rate.calculate(&source_pair)?;
        metrics.insert(copy_rate.metric, MetricValue::from_f64(copy_rate.score));

        let number_preservation = self.number_preservation.calculate(&source_pair)?;
        metrics.insert(
            MetricId::NumberPreservation,
            MetricValue::from_f64(number_preservation.preserved),
        );

        Self::merge_external(&mut metrics, external);

        let reference_free_total =
            ScoreAggregator::reference_free(&metrics, &self.config.reference_free_weights);
        let reference_total = if reference_pair.is_some() {
            ScoreAggregator::reference_based(&metrics, &self.config.reference_weights)
        } else {
            MetricValue::Unavailable
        };

        let total = if reference_pair.is_some() {
            reference_total.clone()
        } else {
            reference_free_total.clone()
        };
        debug!("Pair total: {}", total.format(MetricId::Total.precision()));
        metrics.insert(MetricId::Total, total);

        Ok(PairEvaluation {
            metrics,
            number_preservation,
            text_stats: TextStats::from_text(candidate),
            reference_total,
            reference_free_total,
        })
    }

    fn merge_external(metrics: &mut MetricSet, external: &ExternalScores) {
        let judgement = external.llm.as_ref();
        let supplied = [
            (MetricId::BertScore, external.bert_f1()),
            (MetricId::Comet, external.comet.clone()),
            (MetricId::CometQe, external.comet_qe.clone()),
            (
                MetricId::LlmScore,
                judgement.map(|j| j.overall.clone()).unwrap_or_default(),
            ),
            (
                MetricId::Fluency,
                judgement.map(|j| j.fluency.clone()).unwrap_or_default(),
            ),
            (
                MetricId::Adequacy,
                judgement.map(|j| j.adequacy.clone()).unwrap_or_default(),
            ),
        ];

        for (metric, value) in supplied {
            match &value {
                MetricValue::Unavailable => continue,
                MetricValue::Errored(reason) => {
                    warn!("External {} score failed: {}", metric, reason);
                }
                MetricValue::Value(_) => {}
            }
            metrics.insert(metric, value);
        }
    }
}
