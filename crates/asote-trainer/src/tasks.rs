//! Dataset preparation, statistics, evaluation and merging tasks behind the
//! `asote` command line.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use asote_core::reader::{read_documents, write_documents, write_raw, RawReader};
use asote_core::{
    heuristic_ceiling, merge, DataSplit, Dataset, DatasetStats, EvalReport, Evaluator, Sentence,
    SpanPairReader,
};
use serde::Serialize;
use tracing::info;

use crate::config::TrainingConfig;

/// Per-split outcome of `run_prepare`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitSummary {
    pub split: DataSplit,
    pub sentences: usize,
    pub without_relations: usize,
    /// Sentences written, i.e. those the reader accepted.
    pub examples: usize,
    pub candidate_spans: usize,
    pub positive_pairs: usize,
    pub output: PathBuf,
}

/// Outcome of `run_prepare`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepareSummary {
    pub splits: Vec<SplitSummary>,
    pub config_path: PathBuf,
}

/// Converts the three splits under `data_dir` into span-model documents in
/// `output_dir` and writes the trainer configuration next to them.
///
/// Every sentence is turned into a span-pair example first, so offsets that
/// do not fit the configuration fail here rather than inside the trainer.
pub fn run_prepare(
    data_dir: &Path,
    output_dir: &Path,
    config: TrainingConfig,
    cuda_device: Option<i32>,
) -> Result<PrepareSummary> {
    config.validate()?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let reader = SpanPairReader::new(config.reader_config());
    info!(
        max_span_width = reader.config().max_span_width,
        allow_empty_relations = reader.config().allow_empty_relations,
        "building span-pair examples"
    );
    let mut splits = Vec::new();

    for &split in DataSplit::all() {
        let mut dataset = Dataset::new(data_dir, split);
        let sentences = dataset
            .load()
            .with_context(|| format!("failed to load {split} split from {}", data_dir.display()))?
            .to_vec();

        let examples = reader
            .build_all(&sentences)
            .with_context(|| format!("invalid sentence in {split} split"))?;

        let kept: Vec<Sentence> = sentences
            .iter()
            .filter(|s| s.has_relations() || config.allow_empty_relations)
            .cloned()
            .collect();
        let output = output_dir.join(split.document_file());
        write_documents(&output, &kept)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let summary = SplitSummary {
            split,
            sentences: sentences.len(),
            without_relations: dataset.num_without_relations(),
            examples: examples.len(),
            candidate_spans: examples.iter().map(|e| e.num_spans()).sum(),
            positive_pairs: examples.iter().map(|e| e.num_positive_pairs()).sum(),
            output,
        };
        info!(
            split = %split,
            sentences = summary.sentences,
            without_relations = summary.without_relations,
            examples = summary.examples,
            "prepared split"
        );
        splits.push(summary);
    }

    let mut config = config.with_data_dir(output_dir);
    if let Some(device) = cuda_device {
        config = config.with_cuda_device(device);
    }
    let config_path = output_dir.join("config.json");
    config.save(&config_path)?;
    info!(path = %config_path.display(), "wrote training config");

    Ok(PrepareSummary {
        splits,
        config_path,
    })
}

/// Statistics for one split, plus the closest-pair heuristic ceiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsOutput {
    pub split: DataSplit,
    pub stats: DatasetStats,
    pub heuristic: EvalReport,
}

pub fn run_stats(data_dir: &Path, split: DataSplit) -> Result<StatsOutput> {
    let mut dataset = Dataset::new(data_dir, split);
    let sentences = dataset
        .load()
        .with_context(|| format!("failed to load {split} split from {}", data_dir.display()))?;
    Ok(StatsOutput {
        split,
        stats: DatasetStats::compute(sentences),
        heuristic: heuristic_ceiling(sentences)?,
    })
}

/// Reads sentences from a single file, by extension: `.json` documents or
/// raw triplet lines.
pub fn load_sentences(path: &Path) -> Result<Vec<Sentence>> {
    let sentences = if is_json(path) {
        read_documents(path, None)
    } else {
        RawReader::new()?.read(path, None)
    }
    .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(sentences)
}

pub fn run_eval(pred: &Path, gold: &Path, print_limit: usize) -> Result<EvalReport> {
    let pred = load_sentences(pred)?;
    let gold = load_sentences(gold)?;
    let report = Evaluator::new()
        .with_print_limit(print_limit)
        .run(&pred, &gold)?;
    Ok(report)
}

/// Merges one split of several dataset roots into `output`, written as
/// documents for a `.json` path and as raw triplet lines otherwise.
pub fn run_merge(roots: &[PathBuf], split: DataSplit, output: &Path) -> Result<usize> {
    if roots.is_empty() {
        bail!("no dataset roots given");
    }
    let datasets = roots.iter().map(|root| Dataset::new(root, split)).collect();
    let merged = merge(datasets)?;

    if is_json(output) {
        write_documents(output, merged.sentences())?;
    } else {
        write_raw(output, merged.sentences())?;
    }
    info!(
        output = %output.display(),
        sentences = merged.sentences().len(),
        "wrote merged split"
    );
    Ok(merged.sentences().len())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
