//! Criterion benchmarks for the recomputation paths.
//!
//! Benchmarks:
//! 1. Annotation (SMA short/medium/long, returns, volatility) of one instrument
//! 2. Summary over a one-year display range
//! 3. Correlation matrix for four instruments

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricelens_core::{
    annotate, summarize, AnalyticsConfig, Bar, CorrelationMatrix, DisplayRange,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize, phase: f64) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2013, 5, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1 + phase).sin() * 10.0;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    let config = AnalyticsConfig::default();

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count, 0.0);
        group.bench_with_input(BenchmarkId::new("default_windows", bar_count), &bar_count, |b, _| {
            b.iter(|| annotate(black_box(&bars), black_box(&config)))
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let config = AnalyticsConfig::default();
    let series = annotate(&make_bars(1560, 0.0), &config).unwrap();
    let range = DisplayRange::trailing(series.len(), config.default_range_bars).unwrap();
    let view = range.slice(&series).unwrap();

    c.bench_function("summary_365", |b| b.iter(|| summarize(black_box(view))));
}

fn bench_correlation(c: &mut Criterion) {
    let config = AnalyticsConfig::default();
    let symbols = ["AMZN", "BTC", "DPZ", "NFLX"];
    let series: Vec<_> = symbols
        .iter()
        .enumerate()
        .map(|(i, _)| annotate(&make_bars(1560, i as f64), &config).unwrap())
        .collect();

    c.bench_function("correlation_4x4", |b| {
        b.iter(|| {
            CorrelationMatrix::compute(
                symbols.iter().copied().zip(series.iter().map(|s| s.as_slice())),
                black_box(&config.correlation),
            )
        })
    });
}

criterion_group!(benches, bench_annotate, bench_summary, bench_correlation);
criterion_main!(benches);
