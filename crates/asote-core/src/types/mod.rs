pub mod label;
pub mod sentence;
pub mod span;

pub use label::{EntityLabel, Polarity};
pub use sentence::{entities_from_triples, Sentence, SentimentTriple};
pub use span::{Entity, Span};
