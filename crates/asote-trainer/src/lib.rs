//! # ASOTE Trainer
//!
//! Glue between annotated ASOTE data and the upstream span-model trainer:
//! converts dataset splits into span-model documents (keeping sentences
//! without relations), writes the training configuration, and exposes
//! dataset statistics and evaluation on the command line.

pub mod config;
pub mod tasks;

pub use config::TrainingConfig;
pub use tasks::{
    load_sentences, run_eval, run_merge, run_prepare, run_stats, PrepareSummary, SplitSummary,
    StatsOutput,
};
