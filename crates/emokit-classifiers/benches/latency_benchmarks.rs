//! Latency benchmarks for the prediction stages and the full chain.
//!
//! Run with: cargo bench -p emokit-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

use emokit_classifiers::{EmotionPredictor, LexiconMatcher, PolarityFallback};
use emokit_core::TextNormalizer;

/// Benchmark the lexicon matcher cascade.
fn benchmark_lexicon_matcher(c: &mut Criterion) {
    let matcher =
        LexiconMatcher::new(TextNormalizer::new()).expect("failed to build lexicon matcher");

    let test_cases = vec![
        ("emoji_hit", "got the job \u{1F600}"),
        ("exact_hit", "I am so happy today"),
        ("fuzzy_hit", "feeling hapyy about this"),
        ("no_match_short", "the meeting is at noon"),
        (
            "no_match_medium",
            "the quarterly report covers revenue, staffing, and the office move",
        ),
    ];

    let mut group = c.benchmark_group("Lexicon_Matcher");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("find_emotion", name), &text, |b, text| {
            b.iter(|| matcher.find_emotion(black_box(text)));
        });
    }

    group.finish();
}

/// Benchmark the polarity fallback scorer.
fn benchmark_polarity_fallback(c: &mut Criterion) {
    let fallback = PolarityFallback::new();

    let test_cases = vec![
        ("strong_positive", "what an amazing wonderful day"),
        ("strong_negative", "I hate this terrible awful thing"),
        ("dead_zone", "the report is on the desk"),
    ];

    let mut group = c.benchmark_group("Polarity_Fallback");
    group.significance_level(0.05);
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("find_emotion", name), &text, |b, text| {
            b.iter(|| fallback.find_emotion(black_box(text)));
        });
    }

    group.finish();
}

/// Benchmark the full chain without a trained model.
fn benchmark_chain(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let predictor = EmotionPredictor::with_defaults(None).expect("failed to build chain");

    let test_cases = vec![
        ("first_stage_resolves", "I am so happy today"),
        ("second_stage_resolves", "everything went wrong, a painful failure"),
        ("neutral_default", "the report is on the desk"),
    ];

    let mut group = c.benchmark_group("Prediction_Chain");
    group.sample_size(100);

    for (name, text) in test_cases {
        group.bench_with_input(BenchmarkId::new("predict", name), &text, |b, text| {
            b.iter(|| rt.block_on(async { predictor.predict(black_box(text)).await.unwrap() }));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_lexicon_matcher,
    benchmark_polarity_fallback,
    benchmark_chain
);
criterion_main!(benches);
