use std::path::Path;

use asote_core::reader::read_documents;
use asote_core::DataSplit;
use asote_trainer::{run_eval, run_merge, run_prepare, run_stats, TrainingConfig};

const TRAIN: &str = "\
The food was great####[([1], [3], 'POS')]
We went there on a Tuesday####[]
The waiter was rude####[([1], [3], 'NEG')]
";
const DEV: &str = "Prices are fair####[([0], [2], 'NEU')]\nJust a sentence####[]\n";
const TEST: &str = "Nothing to say####[]\n";

fn write_dataset(dir: &Path) {
    std::fs::write(dir.join("train.txt"), TRAIN).unwrap();
    std::fs::write(dir.join("dev.txt"), DEV).unwrap();
    std::fs::write(dir.join("test.txt"), TEST).unwrap();
}

#[test]
fn prepare_keeps_sentences_without_relations() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(data.path());

    let summary = run_prepare(data.path(), out.path(), TrainingConfig::default(), Some(0)).unwrap();

    let train = &summary.splits[0];
    assert_eq!(train.split, DataSplit::Train);
    assert_eq!(train.sentences, 3);
    assert_eq!(train.without_relations, 1);
    assert_eq!(train.examples, 3);
    assert_eq!(train.positive_pairs, 2);

    let test = &summary.splits[2];
    assert_eq!(test.examples, 1);
    assert_eq!(test.positive_pairs, 0);

    let written = read_documents(out.path().join("train.json"), None).unwrap();
    assert_eq!(written.len(), 3);
    assert!(written[1].triples.is_empty());

    let config = TrainingConfig::load(&summary.config_path).unwrap();
    assert_eq!(config.cuda_device, 0);
    assert_eq!(config.train_data_path, out.path().join("train.json"));
    assert!(config.allow_empty_relations);
}

#[test]
fn prepare_without_empty_relations_drops_them() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_dataset(data.path());

    let config = TrainingConfig::default().with_empty_relations(false);
    let summary = run_prepare(data.path(), out.path(), config, None).unwrap();

    assert_eq!(summary.splits[0].examples, 2);
    assert_eq!(summary.splits[2].examples, 0);
    let written = read_documents(out.path().join("train.json"), None).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|s| s.has_relations()));
}

#[test]
fn prepare_fails_on_spans_wider_than_configured() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("train.txt"),
        "the battery life is great####[([1, 2], [4], 'POS')]\n",
    )
    .unwrap();
    std::fs::write(data.path().join("dev.txt"), "").unwrap();
    std::fs::write(data.path().join("test.txt"), "").unwrap();

    let config = TrainingConfig::default().with_max_span_width(1);
    assert!(run_prepare(data.path(), out.path(), config, None).is_err());
}

#[test]
fn prepare_accepts_unbounded_span_width() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
        data.path().join("train.txt"),
        "the battery life is great####[([1, 2], [4], 'POS')]\n",
    )
    .unwrap();
    std::fs::write(data.path().join("dev.txt"), "").unwrap();
    std::fs::write(data.path().join("test.txt"), "").unwrap();
    let config_path = data.path().join("asote.jsonnet");
    std::fs::write(&config_path, r#"{"max_span_width": 18446744073709551615}"#).unwrap();

    let config = TrainingConfig::load(&config_path).unwrap();
    assert_eq!(config.max_span_width, usize::MAX);
    let summary = run_prepare(data.path(), out.path(), config, None).unwrap();
    assert_eq!(summary.splits[0].candidate_spans, 15);
    assert_eq!(summary.splits[0].positive_pairs, 1);
}

#[test]
fn stats_count_sentences_without_relations() {
    let data = tempfile::tempdir().unwrap();
    write_dataset(data.path());

    let output = run_stats(data.path(), DataSplit::Train).unwrap();
    assert_eq!(output.stats.sentences, 3);
    assert_eq!(output.stats.sentences_without_relations, 1);
    assert_eq!(output.heuristic.num_correct, 2);
}

#[test]
fn eval_gold_against_itself_is_perfect() {
    let data = tempfile::tempdir().unwrap();
    write_dataset(data.path());
    let gold = data.path().join("train.txt");

    let report = run_eval(&gold, &gold, 0).unwrap();
    assert_eq!(report.num_sentences, 3);
    assert_eq!(report.scores.f_score, 1.0);
    assert!(report.diffs.is_empty());
}

#[test]
fn eval_reports_mismatching_sentences_up_to_print_limit() {
    let data = tempfile::tempdir().unwrap();
    write_dataset(data.path());
    let gold = data.path().join("train.txt");
    let pred = data.path().join("pred.txt");
    std::fs::write(
        &pred,
        "The food was great####[([1], [3], 'POS')]\n\
         We went there on a Tuesday####[]\n\
         The waiter was rude####[([1], [3], 'POS')]\n",
    )
    .unwrap();

    let report = run_eval(&pred, &gold, 5).unwrap();
    assert_eq!(report.num_correct, 1);
    assert_eq!(report.diffs.len(), 1);
    assert!(report.diffs[0].false_positives.contains("rude-waiter (POS)"));
    assert!(report.diffs[0].false_negatives.contains("rude-waiter (NEG)"));

    assert!(run_eval(&pred, &gold, 2).unwrap().diffs.is_empty());
}

#[test]
fn merge_writes_raw_or_documents() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_dataset(a.path());
    write_dataset(b.path());
    let out = tempfile::tempdir().unwrap();

    let roots = vec![a.path().to_path_buf(), b.path().to_path_buf()];
    let raw = out.path().join("train.txt");
    assert_eq!(run_merge(&roots, DataSplit::Train, &raw).unwrap(), 6);
    let lines = std::fs::read_to_string(&raw).unwrap();
    assert_eq!(lines.lines().count(), 6);
    assert!(lines.contains("We went there on a Tuesday####[]"));

    let docs = out.path().join("train.json");
    assert_eq!(run_merge(&roots, DataSplit::Train, &docs).unwrap(), 6);
    assert_eq!(read_documents(&docs, None).unwrap().len(), 6);

    assert!(run_merge(&[], DataSplit::Train, &docs).is_err());
}
