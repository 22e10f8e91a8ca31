use criterion::{black_box, criterion_group, criterion_main, Criterion};
use asote_core::reader::{RawReader, SpanPairReader};

fn bench_reader(c: &mut Criterion) {
    let raw = RawReader::new().unwrap();
    let span_pairs = SpanPairReader::default();

    let inputs = vec![
        "The food was great####[([1], [3], 'POS')]",
        "The battery life is long but the screen is dim####[([1, 2], [4], 'POS'), ([7], [9], 'NEG')]",
        "We went there on a Tuesday night after the game####[]",
        "Service was slow , but the staff were friendly and the wine list is excellent####[([0], [2], 'NEG'), ([6], [8], 'POS'), ([11, 12], [14], 'POS')]",
    ];

    c.bench_function("raw_parse_line", |b| {
        b.iter(|| raw.parse_line(black_box(inputs[1]), 1, 0).unwrap());
    });

    let sentences: Vec<_> = inputs
        .iter()
        .enumerate()
        .map(|(i, line)| raw.parse_line(line, i + 1, i).unwrap())
        .collect();

    c.bench_function("span_pair_build_batch_4", |b| {
        b.iter(|| {
            for sentence in &sentences {
                let _ = span_pairs.build(black_box(sentence)).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_reader);
criterion_main!(benches);
