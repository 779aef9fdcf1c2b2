//! Summary statistics for simulation results.

use crate::simulate::StrategyResult;
use serde::{Deserialize, Serialize};

/// Fixed risk-free rate used by the Sharpe-like ratio, in the same percent
/// units as the periodic returns series.
pub const RISK_FREE_RATE: f64 = 0.01;

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator).
///
/// Fewer than two observations have no defined dispersion and yield 0.0.
pub fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Headline statistics for one strategy's simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Total return over the simulation, in percent.
    pub total_return_pct: f64,
    /// (mean periodic return - risk-free rate) / stdev of periodic returns.
    pub sharpe_ratio: f64,
    /// Final portfolio value on the normalized 1.0 baseline.
    pub final_value: f64,
    /// Number of rebalance dates in the simulation.
    pub num_rebalances: usize,
}

impl SummaryStats {
    /// Compute summary statistics from a strategy result.
    pub fn from_result(result: &StrategyResult) -> Self {
        let first = result.values.first().map(|&(_, v)| v);
        let last = result.values.last().map(|&(_, v)| v);

        let total_return_pct = match (first, last) {
            (Some(first), Some(last)) if first != 0.0 => (last / first - 1.0) * 100.0,
            _ => 0.0,
        };

        let returns: Vec<f64> = result.returns_pct.iter().map(|&(_, r)| r).collect();
        let sd = stdev(&returns);
        let sharpe_ratio = if sd > 0.0 {
            (mean(&returns) - RISK_FREE_RATE) / sd
        } else {
            0.0
        };

        Self {
            total_return_pct,
            sharpe_ratio,
            final_value: last.unwrap_or(0.0),
            num_rebalances: result.weights.len(),
        }
    }
}
