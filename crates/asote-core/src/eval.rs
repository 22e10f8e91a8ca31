//! # Triple Evaluation
//!
//! Scores predicted sentences against gold sentences at the triple level,
//! with span-level scores and a few diagnostic counts.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AsoteError, Result};
use crate::types::{entities_from_triples, Entity, EntityLabel, Polarity, Sentence, Span};

/// Precision, recall and F1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Prf {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

impl Prf {
    /// Computes scores from counts. Zero denominators give zero scores.
    #[must_use]
    pub fn from_counts(num_correct: usize, num_pred: usize, num_gold: usize) -> Self {
        let precision = ratio(num_correct, num_pred);
        let recall = ratio(num_correct, num_gold);
        let f_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f_score,
        }
    }
}

pub(crate) fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Span-level scores for one entity label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanScore {
    pub label: EntityLabel,
    pub num_pred: usize,
    pub num_gold: usize,
    pub num_correct: usize,
    pub scores: Prf,
}

/// Count of span-matched triples by (gold, predicted) polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAgreement {
    pub gold: Polarity,
    pub pred: Polarity,
    pub count: usize,
}

/// Evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub num_sentences: usize,
    pub num_pred: usize,
    pub num_gold: usize,
    /// Exact matches including polarity.
    pub num_correct: usize,
    pub num_start_correct: usize,
    pub num_start_end_correct: usize,
    pub num_opinion_correct: usize,
    pub num_target_correct: usize,
    pub num_span_overlap: usize,
    pub scores: Prf,
    pub spans: Vec<SpanScore>,
    /// Fraction of gold triples whose target and opinion spans were both predicted.
    pub relation_recall_ceiling: f64,
    pub label_agreement: Vec<LabelAgreement>,
    /// Inexact sentences among the first `print_limit`.
    pub diffs: Vec<SentenceDiff>,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EvalReport(sentences={}, pred={}, gold={}, correct={}, p={:.4}, r={:.4}, f={:.4})",
            self.num_sentences,
            self.num_pred,
            self.num_gold,
            self.num_correct,
            self.scores.precision,
            self.scores.recall,
            self.scores.f_score
        )
    }
}

/// Triple-level differences for one sentence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentenceDiff {
    pub gold_text: String,
    pub pred_text: String,
    pub true_positives: BTreeSet<String>,
    pub false_positives: BTreeSet<String>,
    pub false_negatives: BTreeSet<String>,
}

impl SentenceDiff {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.false_positives.is_empty() && self.false_negatives.is_empty()
    }
}

/// Compares the triples of one predicted sentence with its gold sentence.
pub fn diff_sentence(pred: &Sentence, gold: &Sentence) -> Result<SentenceDiff> {
    check_aligned(pred, gold)?;
    let gold_triples: BTreeSet<String> =
        gold.triples.iter().map(|t| t.as_text(&gold.tokens)).collect();
    let pred_triples: BTreeSet<String> =
        pred.triples.iter().map(|t| t.as_text(&pred.tokens)).collect();

    Ok(SentenceDiff {
        gold_text: gold.as_text(),
        pred_text: pred.as_text(),
        true_positives: pred_triples.intersection(&gold_triples).cloned().collect(),
        false_positives: pred_triples.difference(&gold_triples).cloned().collect(),
        false_negatives: gold_triples.difference(&pred_triples).cloned().collect(),
    })
}

fn check_aligned(pred: &Sentence, gold: &Sentence) -> Result<()> {
    if pred.tokens != gold.tokens {
        return Err(AsoteError::Mismatch(format!(
            "tokens differ for sentence {} (pred) / {} (gold)",
            pred.id, gold.id
        )));
    }
    Ok(())
}

fn labeled_spans(sentence: &Sentence) -> BTreeSet<Entity> {
    if sentence.entities.is_empty() {
        entities_from_triples(&sentence.triples).into_iter().collect()
    } else {
        sentence.extract_spans().into_iter().collect()
    }
}

/// Scores predictions against gold annotations.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    /// Number of leading sentences whose differences are logged.
    pub print_limit: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_print_limit(mut self, limit: usize) -> Self {
        self.print_limit = limit;
        self
    }

    /// Evaluates aligned prediction and gold sentence lists.
    ///
    /// # Errors
    ///
    /// Returns `Mismatch` if the lists differ in length or a pair has
    /// different tokens.
    pub fn run(&self, pred: &[Sentence], gold: &[Sentence]) -> Result<EvalReport> {
        if pred.len() != gold.len() {
            return Err(AsoteError::Mismatch(format!(
                "{} predicted sentences for {} gold sentences",
                pred.len(),
                gold.len()
            )));
        }

        let mut report = EvalReport {
            num_sentences: pred.len(),
            num_pred: 0,
            num_gold: 0,
            num_correct: 0,
            num_start_correct: 0,
            num_start_end_correct: 0,
            num_opinion_correct: 0,
            num_target_correct: 0,
            num_span_overlap: 0,
            scores: Prf::default(),
            spans: Vec::new(),
            relation_recall_ceiling: 0.0,
            label_agreement: Vec::new(),
            diffs: Vec::new(),
        };
        let mut agreement: BTreeMap<(Polarity, Polarity), usize> = BTreeMap::new();

        for (i, (p, g)) in pred.iter().zip(gold).enumerate() {
            check_aligned(p, g)?;
            if i < self.print_limit {
                let diff = diff_sentence(p, g)?;
                if !diff.is_exact() {
                    info!(
                        gold = %diff.gold_text,
                        pred = %diff.pred_text,
                        tp = ?diff.true_positives,
                        fp = ?diff.false_positives,
                        fn_ = ?diff.false_negatives,
                        "sentence mismatch"
                    );
                    report.diffs.push(diff);
                }
            }

            report.num_pred += p.triples.len();
            report.num_gold += g.triples.len();
            for pt in &p.triples {
                for gt in &g.triples {
                    if pt == gt {
                        report.num_correct += 1;
                    }
                    if (pt.opinion.start, pt.target.start) == (gt.opinion.start, gt.target.start) {
                        report.num_start_correct += 1;
                    }
                    if (pt.opinion, pt.target) == (gt.opinion, gt.target) {
                        report.num_start_end_correct += 1;
                        *agreement.entry((gt.polarity, pt.polarity)).or_default() += 1;
                    }
                    if pt.opinion == gt.opinion {
                        report.num_opinion_correct += 1;
                    }
                    if pt.target == gt.target {
                        report.num_target_correct += 1;
                    }
                    if pt.opinion.overlaps(&gt.opinion) && pt.target.overlaps(&gt.target) {
                        report.num_span_overlap += 1;
                    }
                }
            }
        }

        report.scores = Prf::from_counts(report.num_correct, report.num_pred, report.num_gold);
        report.spans = [EntityLabel::Target, EntityLabel::Opinion]
            .into_iter()
            .map(|label| span_score(pred, gold, label))
            .collect();
        report.relation_recall_ceiling = relation_recall_ceiling(pred, gold);
        report.label_agreement = agreement
            .into_iter()
            .map(|((gold, pred), count)| LabelAgreement { gold, pred, count })
            .collect();

        info!(%report, "evaluation complete");
        Ok(report)
    }
}

fn span_score(pred: &[Sentence], gold: &[Sentence], label: EntityLabel) -> SpanScore {
    let (mut num_pred, mut num_gold, mut num_correct) = (0, 0, 0);
    for (p, g) in pred.iter().zip(gold) {
        let gold_spans: BTreeSet<Span> = labeled_spans(g)
            .into_iter()
            .filter(|e| e.label == label)
            .map(|e| e.span)
            .collect();
        let pred_spans: BTreeSet<Span> = labeled_spans(p)
            .into_iter()
            .filter(|e| e.label == label)
            .map(|e| e.span)
            .collect();
        num_gold += gold_spans.len();
        num_pred += pred_spans.len();
        num_correct += gold_spans.intersection(&pred_spans).count();
    }
    SpanScore {
        label,
        num_pred,
        num_gold,
        num_correct,
        scores: Prf::from_counts(num_correct, num_pred, num_gold),
    }
}

fn relation_recall_ceiling(pred: &[Sentence], gold: &[Sentence]) -> f64 {
    let mut num_gold = 0;
    let mut num_reachable = 0;
    for (p, g) in pred.iter().zip(gold) {
        let spans = labeled_spans(p);
        for t in &g.triples {
            num_gold += 1;
            if spans.contains(&Entity::new(t.target, EntityLabel::Target))
                && spans.contains(&Entity::new(t.opinion, EntityLabel::Opinion))
            {
                num_reachable += 1;
            }
        }
    }
    ratio(num_reachable, num_gold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentTriple;

    fn tokens() -> Vec<String> {
        "the pasta was good but the waiter was rude"
            .split_whitespace()
            .map(String::from)
            .collect()
    }

    fn triple(o: (usize, usize), t: (usize, usize), p: Polarity) -> SentimentTriple {
        SentimentTriple::new(Span::new(o.0, o.1), Span::new(t.0, t.1), p)
    }

    fn gold() -> Sentence {
        Sentence::new(
            0,
            tokens(),
            vec![
                triple((3, 3), (1, 1), Polarity::Positive),
                triple((8, 8), (6, 6), Polarity::Negative),
            ],
        )
    }

    #[test]
    fn perfect_prediction() {
        let report = Evaluator::new().run(&[gold()], &[gold()]).unwrap();
        assert_eq!(report.num_correct, 2);
        assert_eq!(report.scores.f_score, 1.0);
        assert_eq!(report.relation_recall_ceiling, 1.0);
        assert!(report.spans.iter().all(|s| s.scores.f_score == 1.0));
    }

    #[test]
    fn wrong_polarity_counts_span_match_only() {
        let pred = Sentence::new(
            0,
            tokens(),
            vec![triple((3, 3), (1, 1), Polarity::Negative)],
        );
        let report = Evaluator::new().run(&[pred], &[gold()]).unwrap();
        assert_eq!(report.num_pred, 1);
        assert_eq!(report.num_gold, 2);
        assert_eq!(report.num_correct, 0);
        assert_eq!(report.num_start_end_correct, 1);
        assert_eq!(
            report.label_agreement,
            vec![LabelAgreement {
                gold: Polarity::Positive,
                pred: Polarity::Negative,
                count: 1
            }]
        );
        assert_eq!(report.relation_recall_ceiling, 0.5);
    }

    #[test]
    fn overlapping_spans_are_counted() {
        let pred = Sentence::new(
            0,
            tokens(),
            vec![triple((2, 3), (0, 1), Polarity::Positive)],
        );
        let report = Evaluator::new().run(&[pred], &[gold()]).unwrap();
        assert_eq!(report.num_span_overlap, 1);
        assert_eq!(report.num_correct, 0);
    }

    #[test]
    fn sentences_without_relations_score_zero_without_panicking() {
        let empty = Sentence::new(0, tokens(), Vec::new());
        let report = Evaluator::new()
            .run(std::slice::from_ref(&empty), std::slice::from_ref(&empty))
            .unwrap();
        assert_eq!(report.num_gold, 0);
        assert_eq!(report.scores, Prf::default());
        assert_eq!(report.relation_recall_ceiling, 0.0);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        assert!(matches!(
            Evaluator::new().run(&[], &[gold()]),
            Err(AsoteError::Mismatch(_))
        ));
        let other = Sentence::new(0, vec!["different".into()], Vec::new());
        assert!(Evaluator::new().run(&[other], &[gold()]).is_err());
    }

    #[test]
    fn diff_sentence_partitions_triples() {
        let pred = Sentence::new(
            0,
            tokens(),
            vec![
                triple((3, 3), (1, 1), Polarity::Positive),
                triple((8, 8), (1, 1), Polarity::Negative),
            ],
        );
        let diff = diff_sentence(&pred, &gold()).unwrap();
        assert_eq!(diff.true_positives.len(), 1);
        assert!(diff.false_positives.contains("rude-pasta (NEG)"));
        assert!(diff.false_negatives.contains("rude-waiter (NEG)"));
        assert!(!diff.is_exact());
    }

    #[test]
    fn print_limit_collects_inexact_sentences() {
        let wrong = Sentence::new(0, tokens(), vec![triple((3, 3), (1, 1), Polarity::Positive)]);
        let pred = [gold(), wrong];
        let golds = [gold(), gold()];

        let report = Evaluator::new().with_print_limit(5).run(&pred, &golds).unwrap();
        assert_eq!(report.diffs.len(), 1);
        assert!(report.diffs[0].false_negatives.contains("rude-waiter (NEG)"));

        let report = Evaluator::new().with_print_limit(1).run(&pred, &golds).unwrap();
        assert!(report.diffs.is_empty());
        assert!(Evaluator::new().run(&pred, &golds).unwrap().diffs.is_empty());
    }

    #[test]
    fn prf_from_counts() {
        let prf = Prf::from_counts(1, 2, 4);
        assert_eq!(prf.precision, 0.5);
        assert_eq!(prf.recall, 0.25);
        assert!((prf.f_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(Prf::from_counts(0, 0, 0), Prf::default());
    }
}
