//! Weight strategy evaluator: maps a returns window to raw portfolio weights.

use crate::types::{ReturnsWindow, WeightVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule for converting recent return statistics into a target allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightStrategy {
    /// Every asset gets 1/n.
    EqualWeight,
    /// Weight inversely proportional to return volatility.
    RiskParity,
    /// Weight proportional to return volatility.
    RiskAllocation,
    /// Weight proportional to the most recent period's return.
    Momentum,
}

impl fmt::Display for WeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightStrategy::EqualWeight => write!(f, "Equal Weight"),
            WeightStrategy::RiskParity => write!(f, "Risk Parity"),
            WeightStrategy::RiskAllocation => write!(f, "Risk Allocation"),
            WeightStrategy::Momentum => write!(f, "Momentum"),
        }
    }
}

impl WeightStrategy {
    /// All supported strategies, in display order.
    pub fn all() -> [WeightStrategy; 4] {
        [
            WeightStrategy::EqualWeight,
            WeightStrategy::RiskParity,
            WeightStrategy::RiskAllocation,
            WeightStrategy::Momentum,
        ]
    }

    /// Parse a strategy name, accepting display names ("Risk Parity") and
    /// CLI forms ("risk-parity", "risk_parity") case-insensitively.
    ///
    /// Unrecognized names fall back to `EqualWeight` and never error.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "equalweight" => WeightStrategy::EqualWeight,
            "riskparity" => WeightStrategy::RiskParity,
            "riskallocation" => WeightStrategy::RiskAllocation,
            "momentum" => WeightStrategy::Momentum,
            _ => WeightStrategy::EqualWeight,
        }
    }
}

/// Compute raw strategy weights for one returns window.
///
/// Raw scores are divided by their sum when that sum is non-zero; a
/// zero-sum score vector is returned untouched. Enforcing the portfolio
/// invariants (non-negativity, unit sum) is deliberately the simulator's
/// job, not the evaluator's: this function answers "what does the strategy
/// want", nothing more.
///
/// Zero-variance policy: a ticker whose window stdev is exactly zero (or
/// undefined, because the window has fewer than two rows) scores 0.0 under
/// `RiskParity` instead of producing a non-finite weight.
pub fn evaluate(window: &ReturnsWindow, strategy: WeightStrategy) -> WeightVector {
    let n = window.num_tickers();

    let raw: Vec<f64> = match strategy {
        WeightStrategy::EqualWeight => return WeightVector::equal(n),
        WeightStrategy::RiskParity => (0..n)
            .map(|i| {
                let sd = window.column_stdev(i);
                if sd > 0.0 {
                    1.0 / sd
                } else {
                    0.0
                }
            })
            .collect(),
        WeightStrategy::RiskAllocation => (0..n).map(|i| window.column_stdev(i)).collect(),
        WeightStrategy::Momentum => window
            .last_row()
            .map(|row| row.to_vec())
            .unwrap_or_else(|| vec![0.0; n]),
    };

    let sum: f64 = raw.iter().sum();
    if sum != 0.0 {
        WeightVector::new(raw.iter().map(|score| score / sum).collect())
    } else {
        WeightVector::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceHistory, PriceRow};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn window_from_prices(prices: Vec<Vec<f64>>) -> ReturnsWindow {
        let tickers = (0..prices[0].len()).map(|i| format!("T{}", i)).collect();
        let rows = prices
            .into_iter()
            .enumerate()
            .map(|(i, closes)| PriceRow::new(date(i as u32 + 1), closes))
            .collect();
        PriceHistory::new(tickers, rows).unwrap().returns()
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(
            WeightStrategy::from_name("Equal Weight"),
            WeightStrategy::EqualWeight
        );
        assert_eq!(
            WeightStrategy::from_name("risk-parity"),
            WeightStrategy::RiskParity
        );
        assert_eq!(
            WeightStrategy::from_name("RISK_ALLOCATION"),
            WeightStrategy::RiskAllocation
        );
        assert_eq!(
            WeightStrategy::from_name("momentum"),
            WeightStrategy::Momentum
        );
    }

    #[test]
    fn test_from_name_falls_back_to_equal_weight() {
        assert_eq!(
            WeightStrategy::from_name("minimum-variance"),
            WeightStrategy::EqualWeight
        );
        assert_eq!(WeightStrategy::from_name(""), WeightStrategy::EqualWeight);
    }

    #[test]
    fn test_equal_weight_shape() {
        let window = window_from_prices(vec![
            vec![1.0, 1.0, 1.0],
            vec![1.1, 0.9, 1.2],
            vec![1.2, 1.0, 1.1],
        ]);
        let weights = evaluate(&window, WeightStrategy::EqualWeight);
        assert_eq!(weights.len(), 3);
        for &w in weights.iter() {
            assert!((w - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_risk_parity_favors_low_volatility() {
        // T0 swings twice as hard as T1.
        let window = window_from_prices(vec![
            vec![100.0, 100.0],
            vec![120.0, 110.0],
            vec![96.0, 99.0],
            vec![115.2, 108.9],
        ]);
        let weights = evaluate(&window, WeightStrategy::RiskParity);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.as_slice()[1] > weights.as_slice()[0]);
        // Returns of T0 are exactly double T1's, so the split is 1:2.
        assert!((weights.as_slice()[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((weights.as_slice()[1] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_parity_equal_volatility_splits_evenly() {
        let window = window_from_prices(vec![
            vec![100.0, 200.0],
            vec![110.0, 220.0],
            vec![99.0, 198.0],
        ]);
        let weights = evaluate(&window, WeightStrategy::RiskParity);
        assert!((weights.as_slice()[0] - 0.5).abs() < 1e-9);
        assert!((weights.as_slice()[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_risk_parity_zero_variance_scores_zero() {
        // T1 is a constant price: zero stdev must not produce infinity.
        let window = window_from_prices(vec![
            vec![100.0, 50.0],
            vec![110.0, 50.0],
            vec![99.0, 50.0],
        ]);
        let weights = evaluate(&window, WeightStrategy::RiskParity);
        assert!(weights.iter().all(|w| w.is_finite()));
        assert_eq!(weights.as_slice()[1], 0.0);
        assert!((weights.as_slice()[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_allocation_favors_high_volatility() {
        let window = window_from_prices(vec![
            vec![100.0, 100.0],
            vec![120.0, 110.0],
            vec![96.0, 99.0],
            vec![115.2, 108.9],
        ]);
        let weights = evaluate(&window, WeightStrategy::RiskAllocation);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.as_slice()[0] > weights.as_slice()[1]);
    }

    #[test]
    fn test_momentum_uses_latest_return() {
        let window = window_from_prices(vec![
            vec![100.0, 100.0],
            vec![90.0, 95.0],
            vec![99.0, 114.0],
        ]);
        // Latest returns: +0.10 and +0.20.
        let weights = evaluate(&window, WeightStrategy::Momentum);
        assert!((weights.as_slice()[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((weights.as_slice()[1] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_can_return_negative_raw_weights() {
        // Latest returns: -0.10 and +0.30; raw normalization keeps the sign.
        let window = window_from_prices(vec![vec![100.0, 100.0], vec![90.0, 130.0]]);
        let weights = evaluate(&window, WeightStrategy::Momentum);
        assert!(weights.as_slice()[0] < 0.0);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_zero_sum_left_unnormalized() {
        // Latest returns cancel exactly: +0.10 and -0.10.
        let window = window_from_prices(vec![vec![100.0, 100.0], vec![110.0, 90.0]]);
        let weights = evaluate(&window, WeightStrategy::Momentum);
        assert!((weights.as_slice()[0] - 0.1).abs() < 1e-9);
        assert!((weights.as_slice()[1] + 0.1).abs() < 1e-9);
    }
}
