//! Rebal - a walk-forward portfolio rebalancing simulator.
//!
//! # Overview
//!
//! Rebal replays the history of an investment portfolio under different
//! periodic rebalancing strategies. Given a price history, a rebalancing
//! frequency, and one or more weighting strategies, it produces per
//! strategy a portfolio value trajectory, a periodic returns series, and
//! the weights used at every rebalance date:
//!
//! - **Walk-forward**: weights at each rebalance date are computed from
//!   returns observed up to that date, never later
//! - **Four weighting strategies**: equal weight, risk parity, risk
//!   allocation, and momentum
//! - **Weekly, monthly, and quarterly** rebalancing over the calendar
//! - **Parallel comparison**: independent strategy runs fan out across a
//!   rayon pool
//! - **CSV data, TOML configuration**: reproducible runs from plain files
//! - **Terminal reporting**: summary statistics, sparklines, and weight
//!   tables
//!
//! # Quick Start
//!
//! ```no_run
//! use rebal::data::{load_csv, CsvConfig};
//! use rebal::simulate::{simulate, Frequency};
//! use rebal::strategy::WeightStrategy;
//!
//! let prices = load_csv("data/prices.csv", &CsvConfig::default()).unwrap();
//! let result = simulate(&prices, Frequency::Monthly, WeightStrategy::RiskParity).unwrap();
//!
//! for (date, value) in &result.values {
//!     println!("{}: {:.4}", date, value);
//! }
//! ```
//!
//! # Comparing strategies
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use rebal::data::{CsvConfig, CsvProvider};
//! use rebal::engine::{run_simulations, SimulationRequest};
//! use rebal::simulate::Frequency;
//! use rebal::strategy::WeightStrategy;
//!
//! let provider = CsvProvider::from_path("data/prices.csv", &CsvConfig::default()).unwrap();
//! let request = SimulationRequest {
//!     tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
//!     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     frequency: Frequency::Monthly,
//!     initial_cash: 100_000.0,
//!     strategies: vec![WeightStrategy::EqualWeight, WeightStrategy::Momentum],
//! };
//!
//! let runs = run_simulations(&request, &provider).unwrap();
//! println!("{}", rebal::report::comparison_table(&runs, request.initial_cash));
//! ```
//!
//! # Modules
//!
//! - [`types`]: core data model (price history, returns window, weights)
//! - [`strategy`]: weight strategy evaluator
//! - [`simulate`]: walk-forward rebalancing simulator
//! - [`engine`]: multi-strategy driver and price provider seam
//! - [`data`]: CSV price-history loading
//! - [`analytics`]: summary statistics
//! - [`report`]: terminal presentation
//! - [`config`]: TOML configuration file support

pub mod analytics;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod report;
pub mod simulate;
pub mod strategy;
pub mod types;

// Re-exports for convenience
pub use analytics::{mean, stdev, SummaryStats, RISK_FREE_RATE};
pub use config::SimulationFileConfig;
pub use data::{load_csv, CsvConfig, CsvProvider};
pub use engine::{run_simulations, PriceProvider, SimulationRequest, StrategyRun};
pub use error::{RebalError, Result};
pub use simulate::{rebalance_dates, simulate, Frequency, StrategyResult};
pub use strategy::{evaluate, WeightStrategy};
pub use types::{PriceHistory, PriceRow, ReturnsWindow, WeightVector};
