//! Batch statistics over exported evaluation records

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use translation_eval_core::EvaluationRecord;
use translation_eval_metrics::{BatchStatistics, BatchSummary};
use validator::Validate;

use crate::output::{new_table, print_field, print_section, OutputWriter, TableDisplay};

/// Summarise a JSON array of evaluation records per model
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Path to a JSON file holding an array of evaluation records
    pub records: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StatsReport {
    models: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip)]
    summary: BatchSummary,
}

impl StatsReport {
    fn new(summary: BatchSummary) -> Self {
        let models = summary
            .iter()
            .map(|(model, stats)| (model.clone(), stats.formatted()))
            .collect();
        Self { models, summary }
    }
}

impl TableDisplay for StatsReport {
    fn display_table(&self) {
        for (model, stats) in &self.summary {
            print_section(model);

            if stats.metrics.is_empty() {
                println!("  No valid metric values");
            } else {
                let mut table = new_table(&["Metric", "Mean", "Min", "Max", "Std", "Count"]);
                for (metric, summary) in &stats.metrics {
                    table.add_row(vec![
                        Cell::new(metric.display_name()),
                        Cell::new(format!("{:.2}", summary.mean)),
                        Cell::new(format!("{:.2}", summary.min)),
                        Cell::new(format!("{:.2}", summary.max)),
                        Cell::new(format!("{:.2}", summary.std_dev)),
                        Cell::new(summary.count),
                    ]);
                }
                println!("{table}");
            }

            if let Some(time) = &stats.time {
                print_field(
                    "Time",
                    &format!(
                        "{:.2}s average, {:.2}s total",
                        time.average_seconds, time.total_seconds
                    ),
                );
            }
            if let Some(cost) = &stats.cost {
                print_field(
                    "Cost",
                    &format!("${:.4} average, ${:.4} total", cost.average, cost.total),
                );
            }
        }
    }
}

pub fn execute(args: StatsArgs, output: &OutputWriter) -> Result<()> {
    let records = read_records(&args.records)?;

    match BatchStatistics::summarize(&records) {
        Some(summary) => output.write(&StatsReport::new(summary)),
        None => {
            output.info("No evaluation records");
            output.write(&StatsReport::new(BatchSummary::new()))
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<EvaluationRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;

    let records: Vec<EvaluationRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;

    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .with_context(|| format!("Invalid record at index {index}"))?;
    }

    Ok(records)
}
