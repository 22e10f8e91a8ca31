//! Training configuration handed to the upstream span-model trainer.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use asote_core::ReaderConfig;
use serde::{Deserialize, Serialize};

/// Hyperparameters and data paths for one training run.
///
/// Stored as JSON, which the upstream jsonnet-based trainer reads as is.
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub train_data_path: PathBuf,
    pub validation_data_path: PathBuf,
    pub test_data_path: PathBuf,
    /// Pretrained transformer used for span representations.
    pub model_name: String,
    pub max_span_width: usize,
    pub num_epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Learning rate of the transformer parameters.
    pub encoder_learning_rate: f64,
    /// Epochs without validation improvement before stopping.
    pub patience: usize,
    pub seed: u64,
    /// GPU index, `-1` for CPU.
    pub cuda_device: i32,
    pub allow_empty_relations: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            train_data_path: PathBuf::from("train.json"),
            validation_data_path: PathBuf::from("dev.json"),
            test_data_path: PathBuf::from("test.json"),
            model_name: "bert-base-uncased".to_string(),
            max_span_width: 8,
            num_epochs: 10,
            batch_size: 1,
            learning_rate: 1e-3,
            encoder_learning_rate: 5e-5,
            patience: 5,
            seed: 0,
            cuda_device: -1,
            allow_empty_relations: true,
        }
    }
}

impl TrainingConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a configuration file.
    ///
    /// Whole-line `//` and `#` comments are ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let json: String = content
            .lines()
            .filter(|line| {
                let line = line.trim_start();
                !line.starts_with("//") && !line.starts_with('#')
            })
            .collect::<Vec<_>>()
            .join("\n");
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_epochs == 0 {
            bail!("num_epochs must be positive");
        }
        if self.max_span_width == 0 {
            bail!("max_span_width must be positive");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be positive");
        }
        if !(self.learning_rate > 0.0) || !(self.encoder_learning_rate > 0.0) {
            bail!("learning rates must be positive");
        }
        if self.model_name.trim().is_empty() {
            bail!("model_name must not be empty");
        }
        Ok(())
    }

    /// Set the number of epochs (at least 1).
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.num_epochs = epochs.max(1);
        self
    }

    /// Set the maximum span width (at least 1).
    pub fn with_max_span_width(mut self, width: usize) -> Self {
        self.max_span_width = width.max(1);
        self
    }

    /// Set the GPU index, `-1` for CPU.
    pub fn with_cuda_device(mut self, device: i32) -> Self {
        self.cuda_device = device.max(-1);
        self
    }

    /// Accept or reject sentences without relations.
    pub fn with_empty_relations(mut self, allowed: bool) -> Self {
        self.allow_empty_relations = allowed;
        self
    }

    /// Points the three data paths at `{dir}/{train,dev,test}.json`.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        self.train_data_path = dir.join("train.json");
        self.validation_data_path = dir.join("dev.json");
        self.test_data_path = dir.join("test.json");
        self
    }

    /// Reader settings derived from this configuration.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::new()
            .with_max_span_width(self.max_span_width)
            .with_empty_relations(self.allow_empty_relations)
    }
}
