//! Criterion benchmarks for TickerLab hot paths.
//!
//! Benchmarks:
//! 1. Full indicator row computation at several lookback sizes
//! 2. Individual indicators over a 200-day close series
//! 3. Reconciling a computed batch into the in-memory store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tickerlab_core::engine::{compute_rows, indicator_for};
use tickerlab_core::{save_indicators, IndicatorColumn, MemoryStore, PriceRecord};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_records(n: usize) -> Vec<PriceRecord> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceRecord {
                symbol: "BENCH".to_string(),
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

// ── 1. Row computation ───────────────────────────────────────────────

fn bench_compute_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_rows");
    for n in [100usize, 200, 1000] {
        let records = make_records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| compute_rows(black_box("BENCH"), black_box(records)))
        });
    }
    group.finish();
}

// ── 2. Single indicators ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let closes: Vec<f64> = make_records(200).iter().map(|r| r.close).collect();
    let mut group = c.benchmark_group("indicator");
    for column in [
        IndicatorColumn::Sma200,
        IndicatorColumn::Ema26,
        IndicatorColumn::Rsi14,
        IndicatorColumn::MacdHistogram,
        IndicatorColumn::BbWidth,
    ] {
        let ind = indicator_for(column);
        group.bench_function(column.name(), |b| b.iter(|| ind.compute(black_box(&closes))));
    }
    group.finish();
}

// ── 3. Reconciliation ────────────────────────────────────────────────

fn bench_reconcile(c: &mut Criterion) {
    let rows = compute_rows("BENCH", &make_records(200));
    c.bench_function("save_indicators_fresh_200", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            save_indicators(&mut store, black_box(&rows)).unwrap()
        })
    });

    let mut warm = MemoryStore::new();
    save_indicators(&mut warm, &rows).unwrap();
    c.bench_function("save_indicators_update_200", |b| {
        b.iter(|| save_indicators(&mut warm, black_box(&rows)).unwrap())
    });
}

criterion_group!(benches, bench_compute_rows, bench_indicators, bench_reconcile);
criterion_main!(benches);
