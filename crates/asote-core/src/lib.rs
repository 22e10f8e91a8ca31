//! # ASOTE Core
//!
//! Data layer for training a span-pair triplet model on aspect-opinion
//! sentiment data. Reads annotated sentences, converts them into span-pair
//! training examples, and evaluates predicted triples.
//!
//! Sentences without any aspect-opinion relation are valid input: they become
//! examples whose span pairs are all labeled "no relation".
//!
//! ## Quick Start
//!
//! ```rust
//! use asote_core::reader::{PairLabel, RawReader, SpanPairReader};
//!
//! let raw = RawReader::new().unwrap();
//! let sentence = raw.parse_line("Nothing to complain about####[]", 1, 0).unwrap();
//!
//! let example = SpanPairReader::default().build(&sentence).unwrap();
//! assert!(example.pair_labels().all(|(_, label)| label == PairLabel::NoRelation));
//! ```
pub mod dataset;
pub mod error;
pub mod eval;
pub mod heuristic;
pub mod reader;
pub mod stats;
pub mod types;

// Re-export primary API
pub use dataset::{merge, DataSplit, Dataset};
pub use error::{AsoteError, Result};
pub use eval::{diff_sentence, EvalReport, Evaluator, Prf};
pub use heuristic::TripleHeuristic;
pub use reader::{
    Document, PairLabel, RawReader, ReaderConfig, SpanPairExample, SpanPairReader,
};
pub use stats::{heuristic_ceiling, DatasetStats, SimpleStats};
pub use types::{Entity, EntityLabel, Polarity, Sentence, SentimentTriple, Span};
