//! # Span-Pair Examples
//!
//! Converts annotated sentences into the span-pair training examples the
//! upstream model consumes: every candidate span up to a maximum width, the
//! gold label of each span, and the gold relation between span pairs.
//!
//! A sentence without relations is valid input. It produces the full span
//! enumeration and an empty relation map, so every pair is labeled
//! [`PairLabel::NoRelation`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AsoteError, Result};
use crate::types::{EntityLabel, Polarity, Sentence, Span};

/// Configuration for the span-pair reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Widest candidate span, in tokens.
    pub max_span_width: usize,
    /// Accept sentences without any relation (ASOTE). When `false` such
    /// sentences are rejected, as the ASTE reader does.
    pub allow_empty_relations: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_span_width: 8,
            allow_empty_relations: true,
        }
    }
}

impl ReaderConfig {
    /// Create a new reader configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum span width (at least 1).
    pub fn with_max_span_width(mut self, width: usize) -> Self {
        self.max_span_width = width.max(1);
        self
    }

    /// Accept or reject sentences without relations.
    pub fn with_empty_relations(mut self, allowed: bool) -> Self {
        self.allow_empty_relations = allowed;
        self
    }
}

/// Gold label of an ordered (target, opinion) span pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairLabel {
    NoRelation,
    Relation(Polarity),
}

/// A span-pair training example for one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanPairExample {
    pub sentence_id: usize,
    pub tokens: Vec<String>,
    /// Candidate spans in enumeration order.
    pub spans: Vec<Span>,
    /// Gold label per candidate span.
    pub span_labels: Vec<Option<EntityLabel>>,
    /// `(target span index, opinion span index) -> polarity`.
    pub relations: BTreeMap<(usize, usize), Polarity>,
}

impl SpanPairExample {
    /// Number of candidate spans.
    #[must_use]
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }

    /// Gold label of the ordered pair `(i, j)`.
    #[must_use]
    pub fn pair_label(&self, i: usize, j: usize) -> PairLabel {
        self.relations
            .get(&(i, j))
            .map_or(PairLabel::NoRelation, |&p| PairLabel::Relation(p))
    }

    /// Iterates every ordered pair of distinct candidate spans with its label.
    pub fn pair_labels(&self) -> impl Iterator<Item = ((usize, usize), PairLabel)> + '_ {
        let n = self.spans.len();
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .filter(|(i, j)| i != j)
            .map(|(i, j)| ((i, j), self.pair_label(i, j)))
    }

    /// Number of gold (positive) pairs.
    #[must_use]
    pub fn num_positive_pairs(&self) -> usize {
        self.relations.len()
    }

    /// Index of a span in the enumeration.
    pub fn span_index(&self, span: Span) -> Option<usize> {
        self.spans.iter().position(|s| *s == span)
    }
}

/// Builds span-pair examples from sentences.
#[derive(Debug, Clone, Default)]
pub struct SpanPairReader {
    config: ReaderConfig,
}

impl SpanPairReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Converts one sentence into a span-pair example.
    ///
    /// # Errors
    ///
    /// * `NoRelations` if the sentence has no triples and empty relations
    ///   are not allowed.
    /// * `SpanTooWide` if a gold span exceeds `max_span_width`.
    /// * Any validation error of the sentence itself.
    pub fn build(&self, sentence: &Sentence) -> Result<SpanPairExample> {
        sentence.validate()?;
        if !sentence.has_relations() && !self.config.allow_empty_relations {
            return Err(AsoteError::NoRelations { id: sentence.id });
        }

        let spans = enumerate_spans(sentence.tokens.len(), self.config.max_span_width);
        let index: HashMap<Span, usize> =
            spans.iter().enumerate().map(|(i, s)| (*s, i)).collect();
        let lookup = |span: Span| {
            index.get(&span).copied().ok_or_else(|| AsoteError::SpanTooWide {
                id: sentence.id,
                span,
                max_width: self.config.max_span_width,
            })
        };

        let mut span_labels = vec![None; spans.len()];
        for entity in &sentence.entities {
            span_labels[lookup(entity.span)?] = Some(entity.label);
        }

        let mut relations = BTreeMap::new();
        for triple in &sentence.triples {
            let t = lookup(triple.target)?;
            let o = lookup(triple.opinion)?;
            relations.insert((t, o), triple.polarity);
        }

        if relations.is_empty() {
            debug!(id = sentence.id, spans = spans.len(), "all-negative example");
        }

        Ok(SpanPairExample {
            sentence_id: sentence.id,
            tokens: sentence.tokens.clone(),
            spans,
            span_labels,
            relations,
        })
    }

    /// Builds examples for many sentences, skipping those rejected for having
    /// no relations. Other errors abort.
    pub fn build_all(&self, sentences: &[Sentence]) -> Result<Vec<SpanPairExample>> {
        let mut examples = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            match self.build(sentence) {
                Ok(example) => examples.push(example),
                Err(AsoteError::NoRelations { id }) => {
                    debug!(id, "skipping sentence without relations");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(examples)
    }
}

/// Enumerates all spans of at most `max_width` tokens, ordered by start then end.
pub fn enumerate_spans(len: usize, max_width: usize) -> Vec<Span> {
    (0..len)
        .flat_map(|start| {
            let stop = len.min(start.saturating_add(max_width));
            (start..stop).map(move |end| Span::new(start, end))
        })
        .collect()
}
