//! # Span-Model Documents
//!
//! JSON-lines document format consumed by the upstream span model:
//!
//! ```json
//! {"doc_key": "3", "sentences": [["The","food","was","great"]],
//!  "ner": [[[1,1,"TARGET"],[3,3,"OPINION"]]],
//!  "relations": [[[1,1,3,3,"POS"]]]}
//! ```
//!
//! Every document carries exactly one sentence. Relation rows are
//! `[t_start, t_end, o_start, o_end, polarity]`, and an empty relation row
//! list is a valid sentence without relations.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AsoteError, Result};
use crate::types::{
    entities_from_triples, Entity, EntityLabel, Polarity, Sentence, SentimentTriple, Span,
};

/// `[start, end, label]`
pub type NerRow = (usize, usize, EntityLabel);

/// `[t_start, t_end, o_start, o_end, polarity]`
pub type RelationRow = (usize, usize, usize, usize, Polarity);

/// One span-model document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_key: String,
    pub sentences: Vec<Vec<String>>,
    #[serde(default)]
    pub ner: Vec<Vec<NerRow>>,
    #[serde(default)]
    pub relations: Vec<Vec<RelationRow>>,
}

impl Document {
    /// Wraps a sentence into a single-sentence document keyed by its id.
    pub fn from_sentence(sentence: &Sentence) -> Self {
        let ner = sentence
            .extract_spans()
            .into_iter()
            .map(|e| (e.span.start, e.span.end, e.label))
            .collect();
        let relations = sentence
            .triples
            .iter()
            .map(|t| {
                (
                    t.target.start,
                    t.target.end,
                    t.opinion.start,
                    t.opinion.end,
                    t.polarity,
                )
            })
            .collect();

        Self {
            doc_key: sentence.id.to_string(),
            sentences: vec![sentence.tokens.clone()],
            ner: vec![ner],
            relations: vec![relations],
        }
    }

    /// Converts the document back into a sentence with the given id.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` unless the document holds exactly one
    /// sentence, or a span error if offsets fall outside it.
    pub fn into_sentence(self, id: usize) -> Result<Sentence> {
        let malformed = |reason: String| AsoteError::MalformedDocument {
            doc_key: self.doc_key.clone(),
            reason,
        };

        if self.sentences.len() != 1 {
            return Err(malformed(format!(
                "expected 1 sentence, found {}",
                self.sentences.len()
            )));
        }
        if self.ner.len() > 1 || self.relations.len() > 1 {
            return Err(malformed("annotations for more than one sentence".into()));
        }

        let relations = self.relations.first().cloned().unwrap_or_default();
        let triples: Vec<SentimentTriple> = relations
            .into_iter()
            .map(|(ts, te, os, oe, polarity)| {
                SentimentTriple::new(Span::new(os, oe), Span::new(ts, te), polarity)
            })
            .collect();

        // Relation spans missing from the ner rows are still labeled.
        let entities: Vec<Entity> = self
            .ner
            .first()
            .into_iter()
            .flatten()
            .map(|&(start, end, label)| Entity::new(Span::new(start, end), label))
            .chain(entities_from_triples(&triples))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let tokens = self.sentences.into_iter().next().unwrap_or_default();
        let sentence = Sentence {
            id,
            tokens,
            entities,
            triples,
            weight: 1,
            is_labeled: true,
        };
        sentence.validate()?;
        Ok(sentence)
    }
}

/// Reads up to `num_instances` documents (all when `None`) from a JSON-lines file.
pub fn read_documents<P: AsRef<Path>>(path: P, num_instances: Option<usize>) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let limit = num_instances.unwrap_or(usize::MAX);

    let mut sentences = Vec::new();
    for line in reader.lines() {
        if sentences.len() >= limit {
            break;
        }
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(line)?;
        sentences.push(doc.into_sentence(sentences.len())?);
    }

    info!(
        path = %path.display(),
        sentences = sentences.len(),
        "read span-model documents"
    );
    Ok(sentences)
}

/// Writes one document per sentence as JSON lines.
pub fn write_documents<P: AsRef<Path>>(path: P, sentences: &[Sentence]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for sentence in sentences {
        let json = serde_json::to_string(&Document::from_sentence(sentence))?;
        writeln!(out, "{json}")?;
    }
    out.flush()?;
    Ok(())
}
