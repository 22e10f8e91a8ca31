//! # Dataset Statistics
//!
//! Corpus-level diagnostics over annotated sentences: label distribution,
//! span lengths and distances, how terms are shared between triples, and
//! how many sentences carry no relation at all.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::eval::{ratio, EvalReport, Evaluator};
use crate::heuristic::TripleHeuristic;
use crate::types::{Polarity, Sentence, Span};

/// Summary of a list of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimpleStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl SimpleStats {
    /// Summarizes `values`. An empty list gives all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        Self {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean: sorted.iter().sum::<f64>() / n as f64,
            median,
        }
    }

    fn from_counts(values: impl IntoIterator<Item = usize>) -> Self {
        let values: Vec<f64> = values.into_iter().map(|v| v as f64).collect();
        Self::from_values(&values)
    }
}

/// Where an opinion's targets sit relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionCounts {
    /// All targets after the opinion.
    pub after: usize,
    /// All targets before (or centered on) the opinion.
    pub before: usize,
    /// Targets on both sides.
    pub mixed: usize,
}

/// Corpus statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub sentences: usize,
    pub sentences_without_relations: usize,
    pub triples: usize,
    pub sentiments: BTreeMap<Polarity, usize>,
    pub target_lengths: SimpleStats,
    pub opinion_lengths: SimpleStats,
    pub sentence_lengths: SimpleStats,
    /// Distance between target and opinion midpoints.
    pub span_distance: SimpleStats,
    pub targets_per_sentence: SimpleStats,
    pub opinions_per_sentence: SimpleStats,
    /// Fraction of target terms directly followed by another target term.
    pub joined_targets: f64,
    /// Fraction of opinion terms directly followed by another opinion term.
    pub joined_opinions: f64,
    /// Fraction of tokens tagged `Target`, `Opinion` or `None`.
    pub tag_ratios: BTreeMap<String, f64>,
    /// Fraction of opinion terms tied to a single polarity.
    pub opinion_single_polarity: f64,
    /// Fraction of target terms tied to a single polarity.
    pub target_single_polarity: f64,
    pub direction: DirectionCounts,
    /// Fraction of triples whose target is closer to the opinion than any
    /// target it is not paired with.
    pub closest_target_ratio: f64,
}

impl DatasetStats {
    pub fn compute(sentences: &[Sentence]) -> Self {
        let triples: Vec<_> = sentences.iter().flat_map(|s| &s.triples).collect();

        let mut sentiments: BTreeMap<Polarity, usize> = BTreeMap::new();
        for t in &triples {
            *sentiments.entry(t.polarity).or_default() += 1;
        }

        let mut targets_total = 0;
        let mut opinions_total = 0;
        let mut targets_joined = 0;
        let mut opinions_joined = 0;
        let mut targets_per_sentence = Vec::with_capacity(sentences.len());
        let mut opinions_per_sentence = Vec::with_capacity(sentences.len());
        for s in sentences {
            let targets: BTreeSet<Span> = s.triples.iter().map(|t| t.target).collect();
            let opinions: BTreeSet<Span> = s.triples.iter().map(|t| t.opinion).collect();
            targets_total += targets.len();
            opinions_total += opinions.len();
            targets_joined += count_joins(&targets);
            opinions_joined += count_joins(&opinions);
            targets_per_sentence.push(targets.len());
            opinions_per_sentence.push(opinions.len());
        }

        let (single_opinion, single_target) = single_polarity_ratios(sentences);

        Self {
            sentences: sentences.len(),
            sentences_without_relations: sentences.iter().filter(|s| !s.has_relations()).count(),
            triples: triples.len(),
            sentiments,
            target_lengths: SimpleStats::from_counts(triples.iter().map(|t| t.target.width())),
            opinion_lengths: SimpleStats::from_counts(triples.iter().map(|t| t.opinion.width())),
            sentence_lengths: SimpleStats::from_counts(sentences.iter().map(|s| s.tokens.len())),
            span_distance: SimpleStats::from_values(
                &triples
                    .iter()
                    .map(|t| (t.opinion.midpoint() - t.target.midpoint()).abs())
                    .collect::<Vec<_>>(),
            ),
            targets_per_sentence: SimpleStats::from_counts(targets_per_sentence),
            opinions_per_sentence: SimpleStats::from_counts(opinions_per_sentence),
            joined_targets: ratio(targets_joined, targets_total),
            joined_opinions: ratio(opinions_joined, opinions_total),
            tag_ratios: tag_ratios(sentences),
            opinion_single_polarity: single_opinion,
            target_single_polarity: single_target,
            direction: direction_counts(sentences),
            closest_target_ratio: closest_target_ratio(sentences),
        }
    }
}

/// Evaluates the closest-pair heuristic on gold terms: the best score
/// reachable from perfectly extracted but unpaired targets and opinions.
pub fn heuristic_ceiling(sentences: &[Sentence]) -> Result<EvalReport> {
    let heuristic = TripleHeuristic::new();
    let pred: Vec<Sentence> = sentences
        .iter()
        .map(|s| {
            let mut p = s.clone();
            p.triples = heuristic.relink(&s.triples);
            p
        })
        .collect();
    Evaluator::new().run(&pred, sentences)
}

/// Number of spans immediately followed by another span of the set.
fn count_joins(spans: &BTreeSet<Span>) -> usize {
    let starts: BTreeSet<usize> = spans.iter().map(|s| s.start).collect();
    spans
        .iter()
        .filter(|s| starts.contains(&(s.end + 1)))
        .count()
}

fn tag_ratios(sentences: &[Sentence]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, usize> =
        [("Target", 0), ("Opinion", 0), ("None", 0)].into_iter().collect();
    let mut total = 0;
    for s in sentences {
        let mut tags = vec!["None"; s.tokens.len()];
        for t in &s.triples {
            for tag in tags.iter_mut().take(t.opinion.end + 1).skip(t.opinion.start) {
                *tag = "Opinion";
            }
            for tag in tags.iter_mut().take(t.target.end + 1).skip(t.target.start) {
                *tag = "Target";
            }
        }
        total += tags.len();
        for tag in tags {
            *counts.entry(tag).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), ratio(n, total)))
        .collect()
}

fn single_polarity_ratios(sentences: &[Sentence]) -> (f64, f64) {
    let mut opinion_single = (0, 0);
    let mut target_single = (0, 0);
    for s in sentences {
        let mut by_opinion: HashMap<Span, BTreeSet<Polarity>> = HashMap::new();
        let mut by_target: HashMap<Span, BTreeSet<Polarity>> = HashMap::new();
        for t in &s.triples {
            by_opinion.entry(t.opinion).or_default().insert(t.polarity);
            by_target.entry(t.target).or_default().insert(t.polarity);
        }
        for labels in by_opinion.values() {
            opinion_single.0 += usize::from(labels.len() == 1);
            opinion_single.1 += 1;
        }
        for labels in by_target.values() {
            target_single.0 += usize::from(labels.len() == 1);
            target_single.1 += 1;
        }
    }
    (
        ratio(opinion_single.0, opinion_single.1),
        ratio(target_single.0, target_single.1),
    )
}

fn direction_counts(sentences: &[Sentence]) -> DirectionCounts {
    let mut counts = DirectionCounts::default();
    for s in sentences {
        let mut offsets: HashMap<Span, (bool, bool)> = HashMap::new();
        for t in &s.triples {
            let after = t.target.midpoint() - t.opinion.midpoint() > 0.0;
            let entry = offsets.entry(t.opinion).or_default();
            if after {
                entry.0 = true;
            } else {
                entry.1 = true;
            }
        }
        for (after, before) in offsets.into_values() {
            match (after, before) {
                (true, false) => counts.after += 1,
                (false, true) => counts.before += 1,
                _ => counts.mixed += 1,
            }
        }
    }
    counts
}

fn closest_target_ratio(sentences: &[Sentence]) -> f64 {
    let mut closest = 0;
    let mut total = 0;
    for s in sentences {
        let valid: BTreeSet<(Span, Span)> =
            s.triples.iter().map(|t| (t.opinion, t.target)).collect();
        for a in &s.triples {
            let dist_a = (a.opinion.midpoint() - a.target.midpoint()).abs();
            let beaten = s.triples.iter().any(|b| {
                let dist_b = (a.opinion.midpoint() - b.target.midpoint()).abs();
                dist_b <= dist_a && !valid.contains(&(a.opinion, b.target))
            });
            closest += usize::from(!beaten);
            total += 1;
        }
    }
    ratio(closest, total)
}
