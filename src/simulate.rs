//! Walk-forward rebalancing simulator.
//!
//! Drives the rebalancing loop: resamples the date axis at the requested
//! frequency, and at each rebalance date recomputes weights from the
//! returns observed up to that date, never later. Within one iteration the
//! portfolio is marked-to-market with the incoming weights *before* the
//! weights are updated (value-then-rebalance ordering).

use crate::error::{RebalError, Result};
use crate::strategy::{evaluate, WeightStrategy};
use crate::types::{PriceHistory, WeightVector};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rebalancing frequency over the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Parse a frequency name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "weekly" | "w" => Some(Frequency::Weekly),
            "monthly" | "m" => Some(Frequency::Monthly),
            "quarterly" | "q" => Some(Frequency::Quarterly),
            _ => None,
        }
    }

    /// Calendar bucket a date belongs to. Dates with the same key fall in
    /// the same rebalancing period.
    fn bucket_key(&self, date: NaiveDate) -> i64 {
        match self {
            Frequency::Weekly => {
                let iso = date.iso_week();
                iso.year() as i64 * 100 + iso.week() as i64
            }
            Frequency::Monthly => date.year() as i64 * 12 + date.month() as i64,
            Frequency::Quarterly => date.year() as i64 * 4 + (date.month() as i64 - 1) / 3,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Weekly => write!(f, "Weekly"),
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Quarterly => write!(f, "Quarterly"),
        }
    }
}

/// Pick the rebalance date for each calendar bucket.
///
/// Boundary convention: the first trading date observed inside each bucket,
/// so the simulation starts at the normalized baseline and every strategy's
/// value series shares a common 1.0 origin. Input dates must be ascending.
pub fn rebalance_dates(dates: &[NaiveDate], frequency: Frequency) -> Vec<NaiveDate> {
    let mut boundaries = Vec::new();
    let mut current_key = None;

    for &date in dates {
        let key = frequency.bucket_key(date);
        if current_key != Some(key) {
            boundaries.push(date);
            current_key = Some(key);
        }
    }

    boundaries
}

/// Output of one strategy's simulation: the portfolio value trajectory,
/// periodic returns, and the weights used at each rebalance date.
///
/// Values are on the normalized baseline (1.0 at the start); scaling by
/// invested cash is presentation-layer concern. The shared `PriceHistory`
/// input is not duplicated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Ticker ordering shared by every weight vector.
    pub tickers: Vec<String>,
    /// Portfolio value at each rebalance date.
    pub values: Vec<(NaiveDate, f64)>,
    /// Period-over-period change of `values`, in percent. One entry fewer
    /// than `values`: the first rebalance date has no defined change.
    pub returns_pct: Vec<(NaiveDate, f64)>,
    /// Weight vector recorded at each rebalance date.
    pub weights: Vec<(NaiveDate, WeightVector)>,
}

impl StrategyResult {
    /// Final portfolio value on the normalized baseline, if any.
    pub fn final_value(&self) -> Option<f64> {
        self.values.last().map(|&(_, v)| v)
    }

    /// Number of rebalance dates.
    pub fn num_rebalances(&self) -> usize {
        self.values.len()
    }
}

/// Clamp and renormalize raw strategy weights.
///
/// Negative and non-finite components are zeroed; the vector is divided by
/// its sum only when that sum is positive, otherwise left as clamped (the
/// zero-division guard). Recorded vectors are therefore always finite and
/// non-negative, and sum to 1.0 unless the guard fired.
fn clamp_and_normalize(raw: WeightVector) -> WeightVector {
    let mut weights: Vec<f64> = raw
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();

    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }

    WeightVector::new(weights)
}

/// Weights for one rebalance date, from returns observed through that date.
///
/// An empty window carries no information to discriminate assets, so every
/// strategy degrades to equal weight there.
fn weights_at(normalized: &PriceHistory, date: NaiveDate, strategy: WeightStrategy) -> WeightVector {
    let window = normalized.returns_through(date);
    if window.is_empty() {
        return WeightVector::equal(normalized.num_tickers());
    }
    clamp_and_normalize(evaluate(&window, strategy))
}

/// Simulate one weighting strategy over a price history.
///
/// At each rebalance date the portfolio is first valued with the weights
/// decided at the previous date, then the weights are recomputed from the
/// returns window ending at the current date. An empty history is an error
/// the caller treats as a skip, not a panic.
pub fn simulate(
    prices: &PriceHistory,
    frequency: Frequency,
    strategy: WeightStrategy,
) -> Result<StrategyResult> {
    if prices.is_empty() {
        return Err(RebalError::NoData);
    }

    let normalized = prices.normalized()?;
    let dates = rebalance_dates(&normalized.dates(), frequency);
    debug!(
        "simulating {} over {} rebalance dates at {} frequency",
        strategy,
        dates.len(),
        frequency
    );

    // Seed: decided at the first rebalance date from data through that
    // date only. With no returns observed yet this is the equal-weight
    // vector, keeping the walk forward free of look-ahead.
    let mut current = weights_at(&normalized, dates[0], strategy);
    if current.sum() <= 0.0 {
        current = WeightVector::equal(normalized.num_tickers());
    }

    let mut values = Vec::with_capacity(dates.len());
    let mut weights_history = Vec::with_capacity(dates.len());

    for &date in &dates {
        let row = normalized.row_at_or_before(date).ok_or_else(|| {
            RebalError::DataError(format!("no observation at or before {}", date))
        })?;

        // Mark-to-market with the incoming weights, then rebalance.
        let value: f64 = row
            .closes
            .iter()
            .zip(current.iter())
            .map(|(price, weight)| price * weight)
            .sum();
        values.push((date, value));

        let next = weights_at(&normalized, date, strategy);
        weights_history.push((date, next.clone()));
        current = next;
    }

    let returns_pct = values
        .windows(2)
        .map(|pair| (pair[1].0, (pair[1].1 / pair[0].1 - 1.0) * 100.0))
        .collect();

    Ok(StrategyResult {
        tickers: prices.tickers().to_vec(),
        values,
        returns_pct,
        weights: weights_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceRow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(tickers: &[&str], rows: Vec<(NaiveDate, Vec<f64>)>) -> PriceHistory {
        PriceHistory::new(
            tickers.iter().map(|t| t.to_string()).collect(),
            rows.into_iter()
                .map(|(d, closes)| PriceRow::new(d, closes))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_frequency_from_name() {
        assert_eq!(Frequency::from_name("Weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::from_name("m"), Some(Frequency::Monthly));
        assert_eq!(
            Frequency::from_name("quarterly"),
            Some(Frequency::Quarterly)
        );
        assert_eq!(Frequency::from_name("daily"), None);
    }

    #[test]
    fn test_weekly_buckets_follow_iso_weeks() {
        // 2024-01-01 is a Monday; the 8th starts the next ISO week.
        let dates = vec![
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 8),
            date(2024, 1, 10),
        ];
        let boundaries = rebalance_dates(&dates, Frequency::Weekly);
        assert_eq!(boundaries, vec![date(2024, 1, 1), date(2024, 1, 8)]);
    }

    #[test]
    fn test_monthly_and_quarterly_buckets() {
        let dates = vec![
            date(2024, 1, 2),
            date(2024, 1, 31),
            date(2024, 2, 1),
            date(2024, 3, 29),
            date(2024, 4, 1),
        ];

        let monthly = rebalance_dates(&dates, Frequency::Monthly);
        assert_eq!(
            monthly,
            vec![
                date(2024, 1, 2),
                date(2024, 2, 1),
                date(2024, 3, 29),
                date(2024, 4, 1)
            ]
        );

        let quarterly = rebalance_dates(&dates, Frequency::Quarterly);
        assert_eq!(quarterly, vec![date(2024, 1, 2), date(2024, 4, 1)]);
    }

    #[test]
    fn test_year_boundary_does_not_merge_buckets() {
        let dates = vec![date(2023, 12, 29), date(2024, 1, 2)];
        let monthly = rebalance_dates(&dates, Frequency::Monthly);
        assert_eq!(monthly.len(), 2);

        let quarterly = rebalance_dates(&dates, Frequency::Quarterly);
        assert_eq!(quarterly.len(), 2);
    }

    #[test]
    fn test_empty_history_is_rejected() {
        let prices = history(&["AAA"], vec![]);
        assert!(matches!(
            simulate(&prices, Frequency::Weekly, WeightStrategy::EqualWeight),
            Err(RebalError::NoData)
        ));
    }

    #[test]
    fn test_first_value_is_baseline() {
        let prices = history(
            &["AAA", "BBB"],
            vec![
                (date(2024, 1, 1), vec![100.0, 40.0]),
                (date(2024, 1, 8), vec![130.0, 38.0]),
                (date(2024, 1, 15), vec![90.0, 44.0]),
            ],
        );

        let result = simulate(&prices, Frequency::Weekly, WeightStrategy::Momentum).unwrap();
        assert!((result.values[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_value_then_rebalance_ordering() {
        // Equal weights at the first date; the value at the second date
        // must use them, not the momentum weights decided there.
        let prices = history(
            &["AAA", "BBB"],
            vec![
                (date(2024, 1, 1), vec![100.0, 100.0]),
                (date(2024, 1, 8), vec![120.0, 90.0]),
            ],
        );

        let result = simulate(&prices, Frequency::Weekly, WeightStrategy::Momentum).unwrap();
        assert_eq!(result.values.len(), 2);
        // 0.5 * 1.2 + 0.5 * 0.9, not the post-rebalance all-in-AAA value.
        assert!((result.values[1].1 - 1.05).abs() < 1e-12);

        // The weights recorded at the second date are the momentum ones:
        // +20% vs -10% clamps BBB to zero.
        let w = &result.weights[1].1;
        assert!((w.as_slice()[0] - 1.0).abs() < 1e-9);
        assert_eq!(w.as_slice()[1], 0.0);
    }

    #[test]
    fn test_returns_series_is_one_shorter() {
        let prices = history(
            &["AAA"],
            vec![
                (date(2024, 1, 1), vec![100.0]),
                (date(2024, 1, 8), vec![110.0]),
                (date(2024, 1, 15), vec![121.0]),
            ],
        );

        let result = simulate(&prices, Frequency::Weekly, WeightStrategy::EqualWeight).unwrap();
        assert_eq!(result.values.len(), 3);
        assert_eq!(result.returns_pct.len(), 2);
        assert!((result.returns_pct[0].1 - 10.0).abs() < 1e-9);
        assert!((result.returns_pct[1].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_and_normalize_guard() {
        let clamped = clamp_and_normalize(WeightVector::new(vec![-0.5, 0.0, -1.0]));
        assert_eq!(clamped.as_slice(), [0.0, 0.0, 0.0]);

        let normalized = clamp_and_normalize(WeightVector::new(vec![3.0, -1.0, 1.0]));
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
        assert_eq!(normalized.as_slice()[1], 0.0);

        let definite = clamp_and_normalize(WeightVector::new(vec![f64::INFINITY, 1.0]));
        assert!(definite.iter().all(|w| w.is_finite()));
    }

    #[test]
    fn test_recorded_weights_are_finite_with_constant_prices() {
        // Constant prices: zero variance everywhere.
        let prices = history(
            &["AAA", "BBB"],
            vec![
                (date(2024, 1, 1), vec![50.0, 50.0]),
                (date(2024, 1, 8), vec![50.0, 50.0]),
                (date(2024, 1, 15), vec![50.0, 50.0]),
            ],
        );

        let result = simulate(&prices, Frequency::Weekly, WeightStrategy::RiskParity).unwrap();
        for (_, weights) in &result.weights {
            assert!(weights.iter().all(|w| w.is_finite()));
        }
    }

    #[test]
    fn test_simulate_is_idempotent() {
        let prices = history(
            &["AAA", "BBB"],
            vec![
                (date(2024, 1, 1), vec![100.0, 40.0]),
                (date(2024, 1, 8), vec![105.0, 42.0]),
                (date(2024, 2, 5), vec![98.0, 47.0]),
                (date(2024, 3, 4), vec![112.0, 41.0]),
            ],
        );

        let a = simulate(&prices, Frequency::Monthly, WeightStrategy::RiskAllocation).unwrap();
        let b = simulate(&prices, Frequency::Monthly, WeightStrategy::RiskAllocation).unwrap();
        assert_eq!(a, b);
    }
}
