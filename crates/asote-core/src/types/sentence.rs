use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::label::{EntityLabel, Polarity};
use super::span::{Entity, Span};
use crate::error::{AsoteError, Result};

/// A gold or predicted (opinion, target, polarity) relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentimentTriple {
    pub opinion: Span,
    pub target: Span,
    pub polarity: Polarity,
}

impl SentimentTriple {
    #[must_use]
    pub fn new(opinion: Span, target: Span, polarity: Polarity) -> Self {
        Self {
            opinion,
            target,
            polarity,
        }
    }

    /// Renders `"opinion-target (POL)"`.
    pub fn as_text(&self, tokens: &[String]) -> String {
        format!(
            "{}-{} ({})",
            self.opinion.text(tokens),
            self.target.text(tokens),
            self.polarity
        )
    }
}

/// An annotated sentence.
///
/// `triples` may be empty: ASOTE data contains sentences without any
/// aspect-opinion relation, and those are first-class training material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: usize,
    pub tokens: Vec<String>,
    pub entities: Vec<Entity>,
    pub triples: Vec<SentimentTriple>,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub is_labeled: bool,
}

fn default_weight() -> u32 {
    1
}

impl Sentence {
    /// Creates a labeled sentence whose entities are derived from its triples.
    pub fn new(id: usize, tokens: Vec<String>, triples: Vec<SentimentTriple>) -> Self {
        let entities = entities_from_triples(&triples);
        Self {
            id,
            tokens,
            entities,
            triples,
            weight: 1,
            is_labeled: true,
        }
    }

    /// Returns `true` if the sentence has at least one relation.
    #[must_use]
    pub fn has_relations(&self) -> bool {
        !self.triples.is_empty()
    }

    /// Distinct labeled spans, sorted by `(start, end, label)`.
    pub fn extract_spans(&self) -> Vec<Entity> {
        self.entities
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Checks that the sentence has tokens and every span is in range.
    ///
    /// # Errors
    ///
    /// Returns `EmptySentence`, `InvalidSpan` or `SpanOutOfRange`.
    pub fn validate(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(AsoteError::EmptySentence { id: self.id });
        }
        let spans = self
            .entities
            .iter()
            .map(|e| e.span)
            .chain(self.triples.iter().flat_map(|t| [t.opinion, t.target]));
        for span in spans {
            self.check_span(span)?;
        }
        Ok(())
    }

    fn check_span(&self, span: Span) -> Result<()> {
        if span.start > span.end {
            return Err(AsoteError::InvalidSpan { id: self.id, span });
        }
        if span.end >= self.tokens.len() {
            return Err(AsoteError::SpanOutOfRange {
                id: self.id,
                span,
                len: self.tokens.len(),
            });
        }
        Ok(())
    }

    /// Renders the sentence with `(opinion)` and `[target]` markup.
    pub fn as_text(&self) -> String {
        let mut tokens = self.tokens.clone();
        let len = tokens.len();
        for t in &self.triples {
            if t.opinion.end >= len || t.target.end >= len {
                continue;
            }
            tokens[t.opinion.start] = format!("({}", tokens[t.opinion.start]);
            tokens[t.opinion.end] = format!("{})", tokens[t.opinion.end]);
            tokens[t.target.start] = format!("[{}", tokens[t.target.start]);
            tokens[t.target.end] = format!("{}]", tokens[t.target.end]);
        }
        tokens.join(" ")
    }
}

/// Derives the distinct, sorted target and opinion entities of a triple list.
pub fn entities_from_triples(triples: &[SentimentTriple]) -> Vec<Entity> {
    triples
        .iter()
        .flat_map(|t| {
            [
                Entity::new(t.target, EntityLabel::Target),
                Entity::new(t.opinion, EntityLabel::Opinion),
            ]
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
