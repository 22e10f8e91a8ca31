use thiserror::Error;

use crate::types::Span;

/// Errors that can occur while reading, converting or evaluating ASOTE data.
#[derive(Debug, Error)]
pub enum AsoteError {
    /// A sentence has no tokens.
    #[error("sentence {id} has no tokens")]
    EmptySentence {
        /// Id of the offending sentence.
        id: usize,
    },

    /// A raw triplet line could not be parsed.
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number in the source file.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A span-model document could not be converted into a sentence.
    #[error("malformed document {doc_key:?}: {reason}")]
    MalformedDocument {
        /// The document's `doc_key`.
        doc_key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A label string is not one of the known polarity or entity labels.
    #[error("unknown label: {0:?}")]
    UnknownLabel(String),

    /// A span has `start > end`.
    #[error("invalid span {span} in sentence {id}")]
    InvalidSpan {
        /// Id of the sentence.
        id: usize,
        /// The span.
        span: Span,
    },

    /// A span reaches past the last token.
    #[error("span {span} out of range for sentence {id} with {len} tokens")]
    SpanOutOfRange {
        /// Id of the sentence.
        id: usize,
        /// The span.
        span: Span,
        /// Number of tokens in the sentence.
        len: usize,
    },

    /// A gold span is wider than the configured maximum span width.
    #[error("span {span} in sentence {id} is wider than max_span_width={max_width}")]
    SpanTooWide {
        /// Id of the sentence.
        id: usize,
        /// The span.
        span: Span,
        /// Configured maximum width.
        max_width: usize,
    },

    /// The reader is configured to reject sentences without relations.
    #[error("sentence {id} has no relations")]
    NoRelations {
        /// Id of the sentence.
        id: usize,
    },

    /// Predictions and gold annotations cannot be aligned.
    #[error("prediction/gold mismatch: {0}")]
    Mismatch(String),

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O failure while reading or writing a dataset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type alias for ASOTE operations.
pub type Result<T> = std::result::Result<T, AsoteError>;
