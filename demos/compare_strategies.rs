//! Example: Comparing Weighting Strategies
//!
//! Runs every built-in weighting strategy over the same price history and
//! prints a side-by-side comparison:
//! 1. Load (or synthesize) a multi-ticker price history
//! 2. Simulate each strategy with monthly rebalancing
//! 3. Display summaries, weight tables, and the comparison table
//!
//! Run with: cargo run --example compare_strategies

use chrono::{Duration, NaiveDate};
use rebal::data::{load_csv, CsvConfig, CsvProvider};
use rebal::engine::{run_simulations, SimulationRequest};
use rebal::report;
use rebal::simulate::Frequency;
use rebal::strategy::WeightStrategy;
use rebal::types::{PriceHistory, PriceRow};

/// Generate a synthetic three-ticker price history with distinct regimes.
fn generate_synthetic_history(days: usize) -> PriceHistory {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let tickers = vec!["AAA".to_string(), "BBB".to_string(), "CCC".to_string()];

    // AAA trends up smoothly, BBB is choppy, CCC drifts down then recovers.
    let mut prices = [100.0, 100.0, 100.0];
    let rows = (0..days)
        .map(|i| {
            let t = i as f64;
            prices[0] *= 1.0005 + (t * 0.9).sin() * 0.002;
            prices[1] *= 1.0001 + (t * 2.3).sin() * 0.012;
            prices[2] *= if i < days / 2 { 0.9996 } else { 1.0009 };
            PriceRow::new(start + Duration::days(i as i64), prices.to_vec())
        })
        .collect();

    PriceHistory::new(tickers, rows).expect("valid synthetic history")
}

fn main() {
    println!("=== Strategy Comparison ===\n");

    // 1. Load data
    println!("1. Loading data...");
    let history = if std::path::Path::new("data/prices.csv").exists() {
        load_csv("data/prices.csv", &CsvConfig::default()).expect("Failed to load data")
    } else {
        println!("   Using synthetic data");
        generate_synthetic_history(500)
    };
    println!(
        "   Loaded {} observations of {} tickers\n",
        history.len(),
        history.num_tickers()
    );

    // 2. Build the request
    let request = SimulationRequest {
        tickers: history.tickers().to_vec(),
        start_date: history.start_date().expect("non-empty history"),
        end_date: history.end_date().expect("non-empty history") + Duration::days(1),
        frequency: Frequency::Monthly,
        initial_cash: 100_000.0,
        strategies: WeightStrategy::all().to_vec(),
    };
    println!("2. Simulating {} strategies...", request.strategies.len());

    let provider = CsvProvider::new(history);
    let runs = run_simulations(&request, &provider).expect("simulation failed");

    // 3. Display results
    for run in &runs {
        report::print_summary(run, request.initial_cash);
    }

    println!("\n3. Comparison:\n");
    println!("{}", report::comparison_table(&runs, request.initial_cash));

    println!("\n=== Comparison Complete ===");
}
