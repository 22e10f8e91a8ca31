//! # asote
//!
//! Umbrella crate for the ASOTE span-pair data layer.
//!
//! Everything from [`asote_core`] is re-exported at the root; the dataset
//! preparation tasks and training configuration live under [`trainer`].
//!
//! ```
//! use asote::{PairLabel, Sentence, SpanPairReader};
//!
//! let sentence = Sentence::new(0, vec!["fine".into(), "day".into()], Vec::new());
//! let example = SpanPairReader::default().build(&sentence).unwrap();
//! assert!(example.pair_labels().all(|(_, l)| l == PairLabel::NoRelation));
//! ```

pub use asote_core::*;

pub mod trainer {
    pub use asote_trainer::*;
}
