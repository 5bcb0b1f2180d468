//! Translation quality scoring CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{score::ScoreArgs, stats::StatsArgs};
use output::{OutputFormat, OutputWriter};

#[derive(Debug, Parser)]
#[command(name = "translation-eval", version, about = "Score machine translations", long_about = None)]
struct Cli {
    /// Configuration file layered over config/default and the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a candidate translation
    Score(ScoreArgs),
    /// Summarise evaluation records per model
    Stats(StatsArgs),
    /// Show the aggregation weights in effect
    Weights,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "translation_eval=debug"
    } else {
        "translation_eval=info"
    };

    // Logs go to stderr so JSON output stays clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine_config = config::load(cli.config.as_deref())?;
    let output = OutputWriter::new(cli.format, cli.no_color);

    match cli.command {
        Commands::Score(args) => commands::score::execute(args, &engine_config, &output),
        Commands::Stats(args) => commands::stats::execute(args, &output),
        Commands::Weights => commands::weights::execute(&engine_config, &output),
    }
}
