use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Marker written for a metric that produced no data.
pub const UNAVAILABLE_MARKER: &str = "N/A";

/// Marker written for a metric whose backend failed.
pub const ERROR_MARKER: &str = "Error";

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix pattern")
});

/// Closed set of metrics known to the engine.
///
/// The serialized form is the wire key used by export layers
/// (`bleu`, `chrF`, `numberPres`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    Bleu,
    Meteor,
    Cer,
    Wer,
    Jaccard,
    ChrF,
    LengthRatio,
    BertScore,
    Comet,
    #[serde(rename = "cometQE")]
    CometQe,
    #[serde(rename = "score")]
    LlmScore,
    Fluency,
    Adequacy,
    Repetition,
    #[serde(rename = "numberPres")]
    NumberPreservation,
    CopyRate,
    Total,
}

/// Per-pair metric mapping.
pub type MetricSet = BTreeMap<MetricId, MetricValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    HigherIsBetter,
    LowerIsBetter,
    /// Best inside a band (length ratio around 100%).
    Optimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Thresholds {
    Higher { excellent: f64, good: f64, poor: f64 },
    Lower { excellent: f64, good: f64, poor: f64 },
    Range { excellent: (f64, f64), good: (f64, f64) },
}

impl MetricId {
    pub const ALL: [MetricId; 17] = [
        MetricId::Bleu,
        MetricId::Meteor,
        MetricId::Cer,
        MetricId::Wer,
        MetricId::Jaccard,
        MetricId::ChrF,
        MetricId::LengthRatio,
        MetricId::BertScore,
        MetricId::Comet,
        MetricId::CometQe,
        MetricId::LlmScore,
        MetricId::Fluency,
        MetricId::Adequacy,
        MetricId::Repetition,
        MetricId::NumberPreservation,
        MetricId::CopyRate,
        MetricId::Total,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MetricId::Bleu => "bleu",
            MetricId::Meteor => "meteor",
            MetricId::Cer => "cer",
            MetricId::Wer => "wer",
            MetricId::Jaccard => "jaccard",
            MetricId::ChrF => "chrF",
            MetricId::LengthRatio => "lengthRatio",
            MetricId::BertScore => "bertScore",
            MetricId::Comet => "comet",
            MetricId::CometQe => "cometQE",
            MetricId::LlmScore => "score",
            MetricId::Fluency => "fluency",
            MetricId::Adequacy => "adequacy",
            MetricId::Repetition => "repetition",
            MetricId::NumberPreservation => "numberPres",
            MetricId::CopyRate => "copyRate",
            MetricId::Total => "total",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MetricId::Bleu => "BLEU",
            MetricId::Meteor => "METEOR",
            MetricId::Cer => "CER",
            MetricId::Wer => "WER",
            MetricId::Jaccard => "Jaccard",
            MetricId::ChrF => "chrF",
            MetricId::LengthRatio => "Length Ratio",
            MetricId::BertScore => "BERTScore",
            MetricId::Comet => "COMET",
            MetricId::CometQe => "COMET-QE",
            MetricId::LlmScore => "Overall",
            MetricId::Fluency => "Fluency",
            MetricId::Adequacy => "Adequacy",
            MetricId::Repetition => "Repetition",
            MetricId::NumberPreservation => "Numbers",
            MetricId::CopyRate => "Copy Rate",
            MetricId::Total => "Total",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricId::Bleu => "Word n-gram precision with brevity penalty. Higher is better",
            MetricId::Meteor => "Exact and synonym alignment with fragmentation penalty. Higher is better",
            MetricId::Cer => "Character error rate. Lower is better",
            MetricId::Wer => "Word error rate. Lower is better",
            MetricId::Jaccard => "Word set overlap. Higher is better",
            MetricId::ChrF => "Character n-gram F-score. Higher is better",
            MetricId::LengthRatio => "Candidate length relative to reference. Closer to 100% is better",
            MetricId::BertScore => "Neural semantic similarity (externally computed). Higher is better",
            MetricId::Comet => "Neural MT metric (externally computed). Higher is better",
            MetricId::CometQe => "Reference-free neural quality estimate. Higher is better",
            MetricId::LlmScore => "LLM judge overall quality on a 1-10 scale. Higher is better",
            MetricId::Fluency => "LLM judge fluency on a 1-10 scale",
            MetricId::Adequacy => "LLM judge adequacy on a 1-10 scale",
            MetricId::Repetition => "Share of repeated word trigrams. Lower is better",
            MetricId::NumberPreservation => "Share of source numbers kept in the candidate. Higher is better",
            MetricId::CopyRate => "Share of candidate words copied from the source. 5-25% is typical",
            MetricId::Total => "Weighted combination of the available metrics. Higher is better",
        }
    }

    /// Decimal places used when the value is exported as text.
    pub fn precision(self) -> usize {
        match self {
            MetricId::Comet | MetricId::CometQe => 4,
            MetricId::LlmScore
            | MetricId::Fluency
            | MetricId::Adequacy
            | MetricId::NumberPreservation
            | MetricId::Total => 1,
            _ => 2,
        }
    }

    /// Metrics that need a reference translation to be computed locally.
    pub fn requires_reference(self) -> bool {
        matches!(
            self,
            MetricId::Bleu
                | MetricId::Meteor
                | MetricId::Cer
                | MetricId::Wer
                | MetricId::Jaccard
                | MetricId::ChrF
                | MetricId::BertScore
                | MetricId::Comet
        )
    }

    pub fn direction(self) -> Option<MetricDirection> {
        self.thresholds().map(|t| match t {
            Thresholds::Higher { .. } => MetricDirection::HigherIsBetter,
            Thresholds::Lower { .. } => MetricDirection::LowerIsBetter,
            Thresholds::Range { .. } => MetricDirection::Optimal,
        })
    }

    fn thresholds(self) -> Option<Thresholds> {
        let higher = |excellent, good, poor| Some(Thresholds::Higher { excellent, good, poor });
        let lower = |excellent, good, poor| Some(Thresholds::Lower { excellent, good, poor });

        match self {
            MetricId::Bleu => higher(60.0, 40.0, 20.0),
            MetricId::Meteor => higher(50.0, 30.0, 15.0),
            MetricId::Total => higher(70.0, 50.0, 30.0),
            MetricId::Cer => lower(10.0, 20.0, 30.0),
            MetricId::Wer => lower(15.0, 30.0, 50.0),
            MetricId::Jaccard | MetricId::ChrF => higher(75.0, 60.0, 40.0),
            MetricId::LengthRatio => Some(Thresholds::Range {
                excellent: (90.0, 110.0),
                good: (80.0, 120.0),
            }),
            MetricId::Repetition => lower(5.0, 15.0, 25.0),
            MetricId::NumberPreservation => higher(100.0, 80.0, 50.0),
            MetricId::BertScore => higher(90.0, 80.0, 70.0),
            MetricId::Comet => higher(0.85, 0.75, 0.60),
            MetricId::CometQe => higher(0.3, 0.2, 0.0),
            MetricId::LlmScore | MetricId::Fluency | MetricId::Adequacy => higher(8.5, 7.0, 5.0),
            MetricId::CopyRate => None,
        }
    }

    /// Classify a value against this metric's quality bands.
    ///
    /// Returns `None` for non-finite values and for metrics without bands.
    pub fn rating(self, value: f64) -> Option<QualityRating> {
        if !value.is_finite() {
            return None;
        }

        let rating = match self.thresholds()? {
            Thresholds::Higher { excellent, good, poor } => {
                if value >= excellent {
                    QualityRating::Excellent
                } else if value >= good {
                    QualityRating::Good
                } else if value >= poor {
                    QualityRating::Fair
                } else {
                    QualityRating::Poor
                }
            }
            Thresholds::Lower { excellent, good, poor } => {
                if value <= excellent {
                    QualityRating::Excellent
                } else if value <= good {
                    QualityRating::Good
                } else if value <= poor {
                    QualityRating::Fair
                } else {
                    QualityRating::Poor
                }
            }
            Thresholds::Range { excellent, good } => {
                if value >= excellent.0 && value <= excellent.1 {
                    QualityRating::Excellent
                } else if value >= good.0 && value <= good.1 {
                    QualityRating::Good
                } else {
                    QualityRating::Fair
                }
            }
        };

        Some(rating)
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MetricId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MetricId::ALL
            .iter()
            .copied()
            .find(|metric| metric.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownMetric(s.to_string()))
    }
}

/// Outcome of a single metric.
///
/// `Unavailable` (no data) and `Errored` (backend failure) are distinct from
/// a numeric zero and are excluded from weighting and averaging.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetricValue {
    #[default]
    Unavailable,
    Errored(String),
    Value(f64),
}

impl MetricValue {
    /// Wrap a computed number; non-finite results become `Unavailable`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            MetricValue::Value(value)
        } else {
            MetricValue::Unavailable
        }
    }

    /// Parse an externally supplied value.
    ///
    /// Accepts a leading numeric prefix (`"87.5%"` parses as 87.5). The
    /// `"N/A"` and `"Error"` markers, empty text and anything non-numeric
    /// never become zero.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed == UNAVAILABLE_MARKER {
            return MetricValue::Unavailable;
        }
        if trimmed.starts_with(ERROR_MARKER) {
            return MetricValue::Errored(trimmed.to_string());
        }

        NUMERIC_PREFIX
            .find(trimmed)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map(MetricValue::from_f64)
            .unwrap_or(MetricValue::Unavailable)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricValue::Value(_))
    }

    /// Fixed-precision text form, or the marker for missing values.
    pub fn format(&self, decimals: usize) -> String {
        match self {
            MetricValue::Value(v) => format!("{:.*}", decimals, v),
            MetricValue::Unavailable => UNAVAILABLE_MARKER.to_string(),
            MetricValue::Errored(_) => ERROR_MARKER.to_string(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::from_f64(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map(MetricValue::from_f64).unwrap_or_default()
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Value(v) => serializer.serialize_f64(*v),
            MetricValue::Unavailable => serializer.serialize_str(UNAVAILABLE_MARKER),
            MetricValue::Errored(_) => serializer.serialize_str(ERROR_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(v)) => MetricValue::from_f64(v),
            Some(Raw::Text(text)) => MetricValue::parse(&text),
            None => MetricValue::Unavailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_keys_round_trip_through_from_str() {
        for metric in MetricId::ALL {
            assert_eq!(metric.key().parse::<MetricId>().unwrap(), metric);
        }
    }

    #[test]
    fn serde_name_matches_key() {
        for metric in MetricId::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric.key()));
        }
    }
}
