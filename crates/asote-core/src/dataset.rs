//! # Dataset Splits
//!
//! Loads a train/dev/test split from a dataset directory, in either the raw
//! triplet format (`{split}.txt`) or the span-model document format
//! (`{split}.json`), and merges several datasets into one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AsoteError, Result};
use crate::reader::{read_documents, RawReader, SpanPairExample, SpanPairReader};
use crate::types::Sentence;

/// A dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSplit {
    Train,
    Dev,
    Test,
}

impl DataSplit {
    pub fn all() -> &'static [DataSplit] {
        &[DataSplit::Train, DataSplit::Dev, DataSplit::Test]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataSplit::Train => "train",
            DataSplit::Dev => "dev",
            DataSplit::Test => "test",
        }
    }

    /// File name of the split in the raw triplet format.
    pub fn raw_file(self) -> String {
        format!("{}.txt", self.as_str())
    }

    /// File name of the split in the span-model document format.
    pub fn document_file(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for DataSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSplit {
    type Err = AsoteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(DataSplit::Train),
            "dev" | "validation" => Ok(DataSplit::Dev),
            "test" => Ok(DataSplit::Test),
            _ => Err(AsoteError::InvalidConfig(format!("unknown split: {s:?}"))),
        }
    }
}

/// One split of a dataset directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub root: PathBuf,
    pub split: DataSplit,
    pub sentences: Option<Vec<Sentence>>,
    /// Cap on the number of sentences read (`None` = all).
    pub num_instances: Option<usize>,
}

impl Dataset {
    pub fn new(root: impl Into<PathBuf>, split: DataSplit) -> Self {
        Self {
            root: root.into(),
            split,
            sentences: None,
            num_instances: None,
        }
    }

    /// Wraps already-loaded sentences.
    pub fn from_sentences(split: DataSplit, sentences: Vec<Sentence>) -> Self {
        Self {
            root: PathBuf::new(),
            split,
            sentences: Some(sentences),
            num_instances: None,
        }
    }

    pub fn with_num_instances(mut self, limit: usize) -> Self {
        self.num_instances = Some(limit);
        self
    }

    /// Path the split will be loaded from: the document file when present,
    /// the raw triplet file otherwise.
    pub fn source_path(&self) -> PathBuf {
        let documents = self.root.join(self.split.document_file());
        if documents.exists() {
            documents
        } else {
            self.root.join(self.split.raw_file())
        }
    }

    /// Loads the split from disk unless it is already loaded.
    pub fn load(&mut self) -> Result<&[Sentence]> {
        if self.sentences.is_none() {
            let path = self.source_path();
            let sentences = if is_document_file(&path) {
                read_documents(&path, self.num_instances)?
            } else {
                RawReader::new()?.read(&path, self.num_instances)?
            };
            self.sentences = Some(sentences);
        }
        Ok(self.sentences.as_deref().unwrap_or_default())
    }

    /// Loaded sentences, empty before `load`.
    pub fn sentences(&self) -> &[Sentence] {
        self.sentences.as_deref().unwrap_or_default()
    }

    /// Number of loaded sentences without any relation.
    pub fn num_without_relations(&self) -> usize {
        self.sentences().iter().filter(|s| !s.has_relations()).count()
    }

    /// Builds span-pair examples for the loaded sentences.
    pub fn examples(&self, reader: &SpanPairReader) -> Result<Vec<SpanPairExample>> {
        reader.build_all(self.sentences())
    }
}

fn is_document_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Loads and concatenates datasets of the same split, renumbering sentence ids.
///
/// # Errors
///
/// Returns `InvalidConfig` for an empty list or mixed splits, or any load error.
pub fn merge(mut datasets: Vec<Dataset>) -> Result<Dataset> {
    let split = datasets
        .first()
        .map(|d| d.split)
        .ok_or_else(|| AsoteError::InvalidConfig("nothing to merge".into()))?;

    let mut merged = Vec::new();
    for dataset in &mut datasets {
        if dataset.split != split {
            return Err(AsoteError::InvalidConfig(format!(
                "cannot merge {} split into {split}",
                dataset.split
            )));
        }
        for sentence in dataset.load()? {
            let mut sentence = sentence.clone();
            sentence.id = merged.len();
            merged.push(sentence);
        }
    }

    info!(
        split = %split,
        datasets = datasets.len(),
        sentences = merged.len(),
        "merged datasets"
    );
    Ok(Dataset::from_sentences(split, merged))
}
