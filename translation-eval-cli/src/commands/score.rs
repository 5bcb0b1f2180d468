//! Score a single translation

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};
use translation_eval_core::{
    BertScore, EngineConfig, ExternalScores, LlmJudgement, MetricId, MetricValue,
    TranslationSample, UNAVAILABLE_MARKER,
};
use translation_eval_metrics::{NumberPreservation, PairEvaluation, PairEvaluator, TextStats};

use crate::output::{
    format_total, new_table, print_field, print_section, rating_cell, value_cell, OutputWriter,
    TableDisplay,
};

/// Score one candidate translation against its source and optional reference
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Source text
    #[arg(short, long)]
    pub source: String,

    /// Human reference translation; reference-based metrics are skipped without it
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Candidate translation to score
    #[arg(short, long)]
    pub candidate: String,

    /// Target language code, selects the METEOR synonym table
    #[arg(short, long)]
    pub lang: Option<String>,

    /// BERTScore F1 on a 0-100 scale
    #[arg(long)]
    pub bert_score: Option<String>,

    /// COMET score (0-1)
    #[arg(long)]
    pub comet: Option<String>,

    /// COMET-QE score (0-1)
    #[arg(long)]
    pub comet_qe: Option<String>,

    /// LLM judge overall score (1-10)
    #[arg(long)]
    pub llm_score: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub language: String,
    pub metrics: BTreeMap<String, String>,
    pub reference_total: String,
    pub reference_free_total: String,
    pub number_preservation: NumberPreservation,
    pub text_stats: TextStats,
    #[serde(skip)]
    evaluation: PairEvaluation,
}

impl ScoreReport {
    fn new(language: String, evaluation: PairEvaluation) -> Self {
        let precision = MetricId::Total.precision();
        Self {
            language,
            metrics: evaluation.formatted(),
            reference_total: evaluation.reference_total.format(precision),
            reference_free_total: evaluation.reference_free_total.format(precision),
            number_preservation: evaluation.number_preservation.clone(),
            text_stats: evaluation.text_stats,
            evaluation,
        }
    }
}

impl TableDisplay for ScoreReport {
    fn display_table(&self) {
        let mut table = new_table(&["Metric", "Value", "Rating"]);
        for (metric, value) in &self.evaluation.metrics {
            if *metric == MetricId::Total {
                continue;
            }
            table.add_row(vec![
                Cell::new(metric.display_name()),
                value_cell(*metric, value),
                rating_cell(*metric, value),
            ]);
        }
        println!("{table}");

        print_section("Totals");
        print_field("Reference-based", &format_total(&self.evaluation.reference_total));
        print_field("Reference-free", &format_total(&self.evaluation.reference_free_total));

        print_section("Details");
        print_field("Language", &self.language);
        print_field(
            "Numbers",
            &format!(
                "{:.1}% preserved, {} missing, {} extra",
                self.number_preservation.preserved,
                self.number_preservation.missing,
                self.number_preservation.extra
            ),
        );
        print_field(
            "Candidate",
            &format!(
                "{} chars, {} words, {} sentences",
                self.text_stats.char_count, self.text_stats.word_count, self.text_stats.sentence_count
            ),
        );
    }
}

pub fn execute(args: ScoreArgs, config: &EngineConfig, output: &OutputWriter) -> Result<()> {
    let mut config = config.clone();
    if let Some(lang) = &args.lang {
        config = config.with_language(lang.clone());
    }

    let evaluator = PairEvaluator::new(&config).context("Failed to build evaluator")?;
    let sample = TranslationSample::new(args.source.clone(), args.reference.clone());
    let external = external_scores(&args);

    let evaluation = evaluator
        .evaluate(&sample, &args.candidate, &external)
        .context("Failed to score translation")?;

    info!(
        "Scored candidate: total {}",
        evaluation.metric(MetricId::Total).format(MetricId::Total.precision())
    );

    output.write(&ScoreReport::new(config.language, evaluation))
}

fn external_scores(args: &ScoreArgs) -> ExternalScores {
    let parse = |metric: MetricId, raw: &Option<String>| -> MetricValue {
        raw.as_deref()
            .map(|raw| parse_external(metric, raw))
            .unwrap_or_default()
    };

    ExternalScores {
        bert_score: args.bert_score.as_ref().map(|_| BertScore {
            f1: parse(MetricId::BertScore, &args.bert_score),
            ..BertScore::default()
        }),
        comet: parse(MetricId::Comet, &args.comet),
        comet_qe: parse(MetricId::CometQe, &args.comet_qe),
        llm: args.llm_score.as_ref().map(|_| LlmJudgement {
            overall: parse(MetricId::LlmScore, &args.llm_score),
            ..LlmJudgement::default()
        }),
    }
}

/// Parse an externally supplied value, warning when text that is neither a
/// number nor a sentinel gets dropped.
fn parse_external(metric: MetricId, raw: &str) -> MetricValue {
    let value = MetricValue::parse(raw);
    if value == MetricValue::Unavailable && raw.trim() != UNAVAILABLE_MARKER {
        warn!("Could not parse {} value '{}', treating it as unavailable", metric, raw);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ScoreArgs {
        ScoreArgs {
            source: "Hello".to_string(),
            reference: None,
            candidate: "Hallo".to_string(),
            lang: None,
            bert_score: None,
            comet: None,
            comet_qe: None,
            llm_score: None,
        }
    }

    #[test]
    fn test_external_scores_from_flags() {
        let scores = external_scores(&ScoreArgs {
            bert_score: Some("91.20".to_string()),
            comet: Some("0.8512".to_string()),
            comet_qe: Some("N/A".to_string()),
            llm_score: Some("8".to_string()),
            ..args()
        });

        assert_eq!(scores.bert_f1(), MetricValue::Value(91.2));
        assert_eq!(scores.comet, MetricValue::Value(0.8512));
        assert_eq!(scores.comet_qe, MetricValue::Unavailable);
        assert_eq!(
            scores.llm.map(|j| j.overall),
            Some(MetricValue::Value(8.0))
        );
    }

    #[test]
    fn test_unparseable_external_value_is_unavailable() {
        let scores = external_scores(&ScoreArgs {
            comet: Some("high".to_string()),
            llm_score: Some("n/a".to_string()),
            ..args()
        });
        assert_eq!(scores.comet, MetricValue::Unavailable);
        assert_eq!(scores.llm.map(|j| j.overall), Some(MetricValue::Unavailable));
        assert!(scores.bert_score.is_none());
    }
}
