//! Detector throughput over synthetic benchmark histories
//!
//! Measures the full per-series pipeline (grouping, deque envelopes,
//! cummin passes, classification, change metrics) across series counts
//! and lengths, with random-walk timings plus an injected step so the
//! flag path is exercised.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use asv_watcher::detector::{Detector, RollingDetector};
use asv_watcher::series::{Sample, SampleRow, SeriesKey};

const SEED: u64 = 0x5eed;

fn random_walk_series(name: &str, len: usize, rng: &mut StdRng) -> Vec<SampleRow> {
    let mut time = 1.0f64;
    (0..len)
        .map(|rev| {
            time = (time + rng.gen_range(-0.01..0.01)).max(0.001);
            // Sustained step halfway through the series.
            let measured = if rev >= len / 2 { time * 1.5 } else { time };
            SampleRow::new(
                SeriesKey::new(name, ""),
                Sample {
                    revision: rev as i64,
                    time: Some(measured),
                    commit_hash: format!("{rev:040x}"),
                    date: None,
                },
            )
        })
        .collect()
}

fn table(n_series: usize, series_len: usize) -> Vec<SampleRow> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut rows = Vec::with_capacity(n_series * series_len);
    for s in 0..n_series {
        rows.extend(random_walk_series(
            &format!("benchmarks.suite_{s}.time_op"),
            series_len,
            &mut rng,
        ));
    }
    rows
}

fn bench_single_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector/single_series");
    let detector = RollingDetector::with_window_size(30).unwrap();

    for &len in &[100usize, 1_000, 10_000] {
        let rows = table(1, len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &rows, |b, rows| {
            b.iter(|| {
                black_box(
                    detector
                        .detect_regressions(black_box(rows.clone()))
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_many_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector/many_series");
    let detector = RollingDetector::with_window_size(30).unwrap();

    for &n_series in &[10usize, 100, 1_000] {
        let rows = table(n_series, 100);
        group.bench_with_input(
            BenchmarkId::from_parameter(n_series),
            &rows,
            |b, rows| {
                b.iter(|| {
                    black_box(
                        detector
                            .detect_regressions(black_box(rows.clone()))
                            .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_window_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector/window_width");
    let rows = table(10, 1_000);

    for &window_size in &[5usize, 30, 200] {
        let detector = RollingDetector::with_window_size(window_size).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(window_size),
            &rows,
            |b, rows| {
                b.iter(|| {
                    black_box(
                        detector
                            .detect_regressions(black_box(rows.clone()))
                            .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_series,
    bench_many_series,
    bench_window_width
);
criterion_main!(benches);
