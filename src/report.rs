//! Terminal presentation of simulation results.
//!
//! Renders what the core deliberately does not: value-over-time sparklines,
//! weights-over-time tables, and per-strategy summary statistics. All
//! functions consume plain [`StrategyRun`]/[`StrategyResult`] values.

use crate::analytics::SummaryStats;
use crate::engine::StrategyRun;
use crate::error::Result;
use crate::simulate::StrategyResult;
use colored::Colorize;
use tabled::{builder::Builder, settings::Style};

/// Characters used for sparkline rendering, ordered from low to high.
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a value series as a Unicode sparkline of at most `width` chars.
///
/// Longer series are downsampled by averaging evenly sized chunks. A flat
/// or empty series renders as mid-level blocks.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let sampled: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        let chunk = (values.len() + width - 1) / width;
        values
            .chunks(chunk)
            .map(|c| c.iter().sum::<f64>() / c.len() as f64)
            .collect()
    };

    let min = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    sampled
        .iter()
        .map(|&v| {
            let level = if range > 0.0 {
                (((v - min) / range) * (SPARKLINE_CHARS.len() - 1) as f64).round() as usize
            } else {
                SPARKLINE_CHARS.len() / 2
            };
            SPARKLINE_CHARS[level.min(SPARKLINE_CHARS.len() - 1)]
        })
        .collect()
}

/// Print a summary block for one strategy run.
///
/// Portfolio values are scaled by `initial_cash` for display; the core
/// series stays on its normalized 1.0 baseline.
pub fn print_summary(run: &StrategyRun, initial_cash: f64) {
    let stats = SummaryStats::from_result(&run.result);
    let values: Vec<f64> = run.result.values.iter().map(|&(_, v)| v).collect();

    println!();
    println!("{}", format!("Strategy: {}", run.strategy).bold().underline());
    if let (Some(&(start, _)), Some(&(end, _))) =
        (run.result.values.first(), run.result.values.last())
    {
        println!("  Period:          {} to {}", start, end);
    }
    println!("  Rebalances:      {:>12}", stats.num_rebalances);
    println!("  Initial Value:   ${:>12.2}", initial_cash);
    println!(
        "  Final Value:     ${:>12.2}  {}",
        stats.final_value * initial_cash,
        format_pct_change(stats.total_return_pct)
    );
    println!("  Total Return:    {:>12.2}%", stats.total_return_pct);
    println!("  Sharpe Ratio:    {:>12.2}", stats.sharpe_ratio);
    println!("  Value:           {}", sparkline(&values, 40));
}

/// Format percentage change with color.
fn format_pct_change(pct: f64) -> String {
    if pct >= 0.0 {
        format!("(+{:.2}%)", pct).green().to_string()
    } else {
        format!("({:.2}%)", pct).red().to_string()
    }
}

/// Render the weights history as a rounded table, one row per rebalance
/// date and one column per ticker.
pub fn weights_table(result: &StrategyResult) -> String {
    let mut builder = Builder::new();

    let mut header = vec!["Date".to_string()];
    header.extend(result.tickers.iter().cloned());
    builder.push_record(header);

    for (date, weights) in &result.weights {
        let mut row = vec![date.to_string()];
        row.extend(weights.iter().map(|w| format!("{:.4}", w)));
        builder.push_record(row);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Render a cross-strategy comparison table.
pub fn comparison_table(runs: &[StrategyRun], initial_cash: f64) -> String {
    let mut builder = Builder::new();
    builder.push_record(["Strategy", "Final Value", "Return %", "Sharpe", "Rebalances"]);

    for run in runs {
        let stats = SummaryStats::from_result(&run.result);
        builder.push_record([
            run.strategy.to_string(),
            format!("${:.2}", stats.final_value * initial_cash),
            format!("{:.2}", stats.total_return_pct),
            format!("{:.2}", stats.sharpe_ratio),
            stats.num_rebalances.to_string(),
        ]);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Serialize a batch of runs to pretty JSON.
pub fn to_json(runs: &[StrategyRun]) -> Result<String> {
    Ok(serde_json::to_string_pretty(runs)?)
}
