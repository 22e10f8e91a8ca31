use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Polarity, SentimentTriple, Span};

/// Pairs unlinked opinion and target terms by proximity.
///
/// Every opinion is paired with its closest target and every target with its
/// closest opinion, measured between span midpoints. The polarity comes from
/// the term doing the choosing. Ties go to the earliest span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleHeuristic;

impl TripleHeuristic {
    pub fn new() -> Self {
        Self
    }

    /// Builds triples from opinion and target terms.
    ///
    /// Returns no triples when either side is empty.
    pub fn run(
        &self,
        opinions: &BTreeMap<Span, Polarity>,
        targets: &BTreeMap<Span, Polarity>,
    ) -> Vec<SentimentTriple> {
        if opinions.is_empty() || targets.is_empty() {
            return Vec::new();
        }

        let mut triples = BTreeSet::new();
        for (&opinion, &polarity) in opinions {
            if let Some(target) = closest(opinion, targets.keys()) {
                triples.insert(SentimentTriple::new(opinion, target, polarity));
            }
        }
        for (&target, &polarity) in targets {
            if let Some(opinion) = closest(target, opinions.keys()) {
                triples.insert(SentimentTriple::new(opinion, target, polarity));
            }
        }
        triples.into_iter().collect()
    }

    /// Runs the heuristic on the gold terms of a sentence's own triples.
    pub fn relink(&self, triples: &[SentimentTriple]) -> Vec<SentimentTriple> {
        let opinions = triples.iter().map(|t| (t.opinion, t.polarity)).collect();
        let targets = triples.iter().map(|t| (t.target, t.polarity)).collect();
        self.run(&opinions, &targets)
    }
}

fn closest<'a>(from: Span, candidates: impl Iterator<Item = &'a Span>) -> Option<Span> {
    let mut best: Option<(f64, Span)> = None;
    for &candidate in candidates {
        let dist = (from.midpoint() - candidate.midpoint()).abs();
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, candidate));
        }
    }
    best.map(|(_, span)| span)
}
