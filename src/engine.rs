//! Multi-strategy simulation driver.
//!
//! Owns the outer loop of a simulation run: validates the request, fetches
//! the price history once through a [`PriceProvider`], and fans the
//! independent per-strategy simulations out across a rayon pool. The price
//! history is shared read-only input; no state crosses strategy runs.

use crate::error::Result;
use crate::simulate::{simulate, Frequency, StrategyResult};
use crate::strategy::WeightStrategy;
use crate::types::PriceHistory;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything needed to run one batch of simulations, passed by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Tickers to include, in portfolio column order.
    pub tickers: Vec<String>,
    /// Inclusive start of the price window.
    pub start_date: NaiveDate,
    /// Exclusive end of the price window.
    pub end_date: NaiveDate,
    /// Rebalancing frequency.
    pub frequency: Frequency,
    /// Cash invested at the start; used for display scaling only.
    pub initial_cash: f64,
    /// Weighting strategies to compare.
    pub strategies: Vec<WeightStrategy>,
}

/// Source of adjusted-close price history.
///
/// Implementations may read files, databases, or remote APIs; the core
/// only sees the resulting table. An empty result is valid and means no
/// data was available for the requested window.
pub trait PriceProvider {
    fn fetch(&self, tickers: &[String], start: NaiveDate, end: NaiveDate)
        -> Result<PriceHistory>;
}

/// One strategy's simulation outcome within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: WeightStrategy,
    pub result: StrategyResult,
}

/// Run every requested strategy over a single shared price history.
///
/// Degenerate requests (inverted date range, nothing selected, no data
/// retrieved) are warnings, not errors: they produce an empty batch so a
/// caller can keep going. A strategy whose simulation fails is skipped
/// with a warning and does not affect the others.
pub fn run_simulations(
    request: &SimulationRequest,
    provider: &dyn PriceProvider,
) -> Result<Vec<StrategyRun>> {
    if request.start_date >= request.end_date {
        warn!(
            "start date {} must be earlier than end date {}",
            request.start_date, request.end_date
        );
        return Ok(Vec::new());
    }

    if request.tickers.is_empty() || request.strategies.is_empty() {
        warn!("select at least one ticker and one strategy");
        return Ok(Vec::new());
    }

    let prices = provider.fetch(&request.tickers, request.start_date, request.end_date)?;
    if prices.is_empty() {
        warn!(
            "no price data retrieved for {} between {} and {}",
            request.tickers.join(", "),
            request.start_date,
            request.end_date
        );
        return Ok(Vec::new());
    }

    info!(
        "simulating {} strategies over {} observations of {} tickers",
        request.strategies.len(),
        prices.len(),
        prices.num_tickers()
    );

    let runs = request
        .strategies
        .par_iter()
        .filter_map(|&strategy| match simulate(&prices, request.frequency, strategy) {
            Ok(result) => Some(StrategyRun { strategy, result }),
            Err(e) => {
                warn!("skipping {}: {}", strategy, e);
                None
            }
        })
        .collect();

    Ok(runs)
}
