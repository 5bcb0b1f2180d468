//! Show the effective aggregation weights

use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;
use translation_eval_core::{
    EngineConfig, MetricId, ReferenceFreeWeights, ReferenceWeights, WeightSet,
};

use crate::output::{new_table, print_section, OutputWriter, TableDisplay};

#[derive(Debug, Serialize)]
pub struct WeightsReport {
    pub reference_weights: ReferenceWeights,
    pub reference_free_weights: ReferenceFreeWeights,
}

#[derive(Debug, PartialEq)]
struct WeightRow {
    metric: MetricId,
    weight: f64,
    share: f64,
}

/// Weight and normalised share (percent) of each metric in the set.
fn weight_rows<W: WeightSet>(weights: &W) -> Vec<WeightRow> {
    let total: f64 = W::METRICS.iter().map(|m| weights.weight(*m)).sum();
    W::METRICS
        .iter()
        .map(|metric| {
            let weight = weights.weight(*metric);
            let share = if total > 0.0 { weight * 100.0 / total } else { 0.0 };
            WeightRow {
                metric: *metric,
                weight,
                share,
            }
        })
        .collect()
}

fn print_weights<W: WeightSet>(title: &str, weights: &W) {
    print_section(title);
    let mut table = new_table(&["Key", "Metric", "Weight", "Share"]);
    for row in weight_rows(weights) {
        table.add_row(vec![
            Cell::new(row.metric.key()),
            Cell::new(row.metric.display_name()),
            Cell::new(format!("{:.1}", row.weight)),
            Cell::new(format!("{:.1}%", row.share)),
        ]);
    }
    println!("{table}");
}

impl TableDisplay for WeightsReport {
    fn display_table(&self) {
        print_weights("Reference-based weights", &self.reference_weights);
        print_weights("Reference-free weights", &self.reference_free_weights);
    }
}

pub fn execute(config: &EngineConfig, output: &OutputWriter) -> Result<()> {
    output.write(&WeightsReport {
        reference_weights: config.reference_weights.clone(),
        reference_free_weights: config.reference_free_weights.clone(),
    })
}
