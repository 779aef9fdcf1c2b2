//! Performance benchmarks for the rebalancing simulator.
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rebal::simulate::{rebalance_dates, simulate, Frequency};
use rebal::strategy::WeightStrategy;
use rebal::types::{PriceHistory, PriceRow};

/// Generate a synthetic daily price history for benchmarking.
fn generate_history(tickers: usize, days: usize) -> PriceHistory {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let names = (0..tickers).map(|i| format!("T{}", i)).collect();

    let mut prices: Vec<f64> = (0..tickers).map(|i| 50.0 + i as f64 * 10.0).collect();
    let rows = (0..days)
        .map(|day| {
            for (i, price) in prices.iter_mut().enumerate() {
                let noise = ((day as f64 * 0.7 + i as f64).sin()
                    + (day as f64 * 1.3 - i as f64).cos())
                    * 0.005;
                *price *= 1.0002 + noise;
            }
            PriceRow::new(start + Duration::days(day as i64), prices.clone())
        })
        .collect();

    PriceHistory::new(names, rows).expect("valid synthetic history")
}

fn bench_simulate(c: &mut Criterion) {
    let history = generate_history(10, 2000);

    let mut group = c.benchmark_group("simulate");
    for strategy in WeightStrategy::all() {
        group.bench_with_input(
            BenchmarkId::new("monthly", strategy),
            &strategy,
            |b, &strategy| {
                b.iter(|| simulate(black_box(&history), Frequency::Monthly, strategy))
            },
        );
    }
    group.bench_function("weekly_risk_parity", |b| {
        b.iter(|| simulate(black_box(&history), Frequency::Weekly, WeightStrategy::RiskParity))
    });
    group.finish();
}

fn bench_rebalance_dates(c: &mut Criterion) {
    let history = generate_history(2, 5000);
    let dates = history.dates();

    let mut group = c.benchmark_group("rebalance_dates");
    for (name, frequency) in [
        ("weekly", Frequency::Weekly),
        ("monthly", Frequency::Monthly),
        ("quarterly", Frequency::Quarterly),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| rebalance_dates(black_box(&dates), frequency))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulate, bench_rebalance_dates);
criterion_main!(benches);
