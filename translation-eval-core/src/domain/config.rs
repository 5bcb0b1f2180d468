use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use super::metric::MetricId;
use crate::error::Result;
use crate::traits::WeightSet;

/// Language whose synonym table is used when the requested one is absent.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language code -> synonym groups.
pub type SynonymGroups = HashMap<String, Vec<Vec<String>>>;

fn validate_weight(weight: f64) -> std::result::Result<(), ValidationError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("non_negative_weight"))
    }
}

// ===== Weight Sets =====

/// Weights for the reference-based total. Zero excludes a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReferenceWeights {
    #[validate(custom(function = "validate_weight"))]
    pub bleu: f64,
    #[validate(custom(function = "validate_weight"))]
    pub meteor: f64,
    #[validate(custom(function = "validate_weight"))]
    pub cer: f64,
    #[validate(custom(function = "validate_weight"))]
    pub wer: f64,
    #[validate(custom(function = "validate_weight"))]
    pub jaccard: f64,
    #[serde(alias = "chrF")]
    #[validate(custom(function = "validate_weight"))]
    pub chrf: f64,
    #[serde(alias = "lengthRatio")]
    #[validate(custom(function = "validate_weight"))]
    pub length_ratio: f64,
    #[serde(alias = "bertScore")]
    #[validate(custom(function = "validate_weight"))]
    pub bert_score: f64,
    #[validate(custom(function = "validate_weight"))]
    pub comet: f64,
}

impl ReferenceWeights {
    /// Every weight zero; useful as a base for selective weighting.
    pub fn zeroed() -> Self {
        Self {
            bleu: 0.0,
            meteor: 0.0,
            cer: 0.0,
            wer: 0.0,
            jaccard: 0.0,
            chrf: 0.0,
            length_ratio: 0.0,
            bert_score: 0.0,
            comet: 0.0,
        }
    }
}

impl Default for ReferenceWeights {
    fn default() -> Self {
        Self {
            bleu: 10.0,
            meteor: 10.0,
            cer: 5.0,
            wer: 5.0,
            jaccard: 5.0,
            chrf: 10.0,
            length_ratio: 5.0,
            bert_score: 20.0,
            comet: 15.0,
        }
    }
}

impl WeightSet for ReferenceWeights {
    const METRICS: &'static [MetricId] = &[
        MetricId::Bleu,
        MetricId::Meteor,
        MetricId::Cer,
        MetricId::Wer,
        MetricId::Jaccard,
        MetricId::ChrF,
        MetricId::LengthRatio,
        MetricId::BertScore,
        MetricId::Comet,
    ];

    fn weight(&self, metric: MetricId) -> f64 {
        match metric {
            MetricId::Bleu => self.bleu,
            MetricId::Meteor => self.meteor,
            MetricId::Cer => self.cer,
            MetricId::Wer => self.wer,
            MetricId::Jaccard => self.jaccard,
            MetricId::ChrF => self.chrf,
            MetricId::LengthRatio => self.length_ratio,
            MetricId::BertScore => self.bert_score,
            MetricId::Comet => self.comet,
            _ => 0.0,
        }
    }
}

/// Weights for the reference-free total. Zero excludes a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReferenceFreeWeights {
    #[validate(custom(function = "validate_weight"))]
    pub repetition: f64,
    #[serde(alias = "numberPres")]
    #[validate(custom(function = "validate_weight"))]
    pub number_preservation: f64,
    #[serde(alias = "copyRate")]
    #[validate(custom(function = "validate_weight"))]
    pub copy_rate: f64,
    #[serde(alias = "lengthRatio")]
    #[validate(custom(function = "validate_weight"))]
    pub length_ratio: f64,
    #[serde(alias = "llmScore")]
    #[validate(custom(function = "validate_weight"))]
    pub llm_score: f64,
    #[serde(alias = "cometQE")]
    #[validate(custom(function = "validate_weight"))]
    pub comet_qe: f64,
}

impl ReferenceFreeWeights {
    pub fn zeroed() -> Self {
        Self {
            repetition: 0.0,
            number_preservation: 0.0,
            copy_rate: 0.0,
            length_ratio: 0.0,
            llm_score: 0.0,
            comet_qe: 0.0,
        }
    }
}

impl Default for ReferenceFreeWeights {
    fn default() -> Self {
        Self {
            repetition: 10.0,
            number_preservation: 15.0,
            copy_rate: 10.0,
            length_ratio: 5.0,
            llm_score: 30.0,
            comet_qe: 30.0,
        }
    }
}

impl WeightSet for ReferenceFreeWeights {
    const METRICS: &'static [MetricId] = &[
        MetricId::Repetition,
        MetricId::NumberPreservation,
        MetricId::CopyRate,
        MetricId::LengthRatio,
        MetricId::LlmScore,
        MetricId::CometQe,
    ];

    fn weight(&self, metric: MetricId) -> f64 {
        match metric {
            MetricId::Repetition => self.repetition,
            MetricId::NumberPreservation => self.number_preservation,
            MetricId::CopyRate => self.copy_rate,
            MetricId::LengthRatio => self.length_ratio,
            MetricId::LlmScore => self.llm_score,
            MetricId::CometQe => self.comet_qe,
            _ => 0.0,
        }
    }
}

// ===== Metric Parameters =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChrfConfig {
    #[validate(range(min = 1, max = 32))]
    pub max_order: usize,
    /// Recall is weighted `beta` times as much as precision.
    #[validate(custom(function = "validate_weight"))]
    pub beta: f64,
}

impl Default for ChrfConfig {
    fn default() -> Self {
        Self {
            max_order: 6,
            beta: 2.0,
        }
    }
}

// ===== Engine Configuration =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// ISO-639-1 code selecting the METEOR synonym table.
    #[validate(length(min = 2, max = 16))]
    pub language: String,
    #[validate(nested)]
    pub reference_weights: ReferenceWeights,
    #[validate(nested)]
    pub reference_free_weights: ReferenceFreeWeights,
    #[validate(nested)]
    pub chrf: ChrfConfig,
    /// Window size for the repetition ratio.
    #[validate(range(min = 1, max = 16))]
    pub repetition_ngram: usize,
    /// Replaces the built-in synonym tables entirely when set.
    pub synonyms: Option<SynonymGroups>,
}

impl EngineConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Run field validation and hand the config back on success.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            reference_weights: ReferenceWeights::default(),
            reference_free_weights: ReferenceFreeWeights::default(),
            chrf: ChrfConfig::default(),
            repetition_ngram: 3,
            synonyms: None,
        }
    }
}
