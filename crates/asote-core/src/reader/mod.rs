pub mod document;
pub mod example;
pub mod raw;

pub use document::{read_documents, write_documents, Document};
pub use example::{enumerate_spans, PairLabel, ReaderConfig, SpanPairExample, SpanPairReader};
pub use raw::{format_line, write_raw, RawReader};
