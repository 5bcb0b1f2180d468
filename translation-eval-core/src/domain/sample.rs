use serde::{Deserialize, Serialize};
use validator::Validate;

use super::metric::MetricId;
use crate::error::{CoreError, Result};

/// The unit every metric consumes.
///
/// For reference-free heuristics `reference` holds the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPair {
    pub reference: Option<String>,
    pub candidate: String,
}

impl TextPair {
    pub fn new(reference: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            candidate: candidate.into(),
        }
    }

    pub fn without_reference(candidate: impl Into<String>) -> Self {
        Self {
            reference: None,
            candidate: candidate.into(),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Borrow the reference, or fail for metrics that cannot run without one.
    pub fn require_reference(&self, metric: MetricId) -> Result<&str> {
        self.reference()
            .ok_or(CoreError::MissingReference(metric))
    }
}

/// A source segment with its optional human translation, as supplied by
/// corpus ingestion (`{original, translation|null}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TranslationSample {
    #[serde(alias = "original")]
    #[validate(length(min = 1))]
    pub source: String,
    #[serde(alias = "translation", default)]
    pub reference: Option<String>,
}

impl TranslationSample {
    pub fn new(source: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            source: source.into(),
            reference,
        }
    }

    /// Empty references count as absent.
    pub fn has_reference(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Pair of reference and candidate, when a usable reference exists.
    pub fn reference_pair(&self, candidate: &str) -> Option<TextPair> {
        if !self.has_reference() {
            return None;
        }
        self.reference
            .as_ref()
            .map(|reference| TextPair::new(reference.clone(), candidate))
    }

    /// Pair of source and candidate for reference-free heuristics.
    pub fn source_pair(&self, candidate: &str) -> TextPair {
        TextPair::new(self.source.clone(), candidate)
    }
}
