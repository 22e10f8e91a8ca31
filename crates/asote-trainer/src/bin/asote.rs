//! ASOTE data preparation and evaluation tool.

use std::path::PathBuf;

use anyhow::Result;
use asote_core::DataSplit;
use asote_trainer::{run_eval, run_merge, run_prepare, run_stats, TrainingConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "asote")]
#[command(about = "Prepare, inspect and evaluate ASOTE span-pair data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dataset directory into span-model documents and a training config
    Prepare {
        /// Directory holding train/dev/test splits
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Where documents and config.json are written
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Base training configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// GPU index for the trainer, -1 for CPU
        #[arg(short, long, allow_negative_numbers = true)]
        gpu: Option<i32>,
    },
    /// Print dataset statistics as JSON
    Stats {
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long, default_value = "train")]
        split: DataSplit,
    },
    /// Evaluate predicted triples against gold triples
    Eval {
        #[arg(short, long)]
        pred: PathBuf,
        #[arg(short, long)]
        gold: PathBuf,
        /// Report the triple differences among the first N sentences
        #[arg(long, default_value_t = 16)]
        print_limit: usize,
    },
    /// Merge one split of several dataset directories
    Merge {
        #[arg(short, long, default_value = "train")]
        split: DataSplit,
        /// Output file (.json for documents, raw triplet lines otherwise)
        #[arg(short, long)]
        output: PathBuf,
        /// Dataset directories to merge
        #[arg(required = true)]
        roots: Vec<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            data_dir,
            output_dir,
            config,
            gpu,
        } => {
            let config = match config {
                Some(path) => TrainingConfig::load(path)?,
                None => TrainingConfig::default(),
            };
            let summary = run_prepare(&data_dir, &output_dir, config, gpu)?;
            info!(config = %summary.config_path.display(), "dataset ready for training");
            print_json(&summary)?;
        }
        Commands::Stats { data_dir, split } => {
            print_json(&run_stats(&data_dir, split)?)?;
        }
        Commands::Eval {
            pred,
            gold,
            print_limit,
        } => {
            let report = run_eval(&pred, &gold, print_limit)?;
            print_json(&report)?;
        }
        Commands::Merge {
            split,
            output,
            roots,
        } => {
            let count = run_merge(&roots, split, &output)?;
            info!(sentences = count, output = %output.display(), "merge complete");
        }
    }

    Ok(())
}
