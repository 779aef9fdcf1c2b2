//! Configuration file support for simulation runs.
//!
//! Allows loading simulation requests from TOML files for reproducibility.

use crate::engine::SimulationRequest;
use crate::error::{RebalError, Result};
use crate::simulate::Frequency;
use crate::strategy::WeightStrategy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Complete simulation configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationFileConfig {
    /// Simulation settings.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Data source settings.
    #[serde(default)]
    pub data: DataSettings,
}

/// Simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Tickers to include, in portfolio column order.
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Inclusive start date (YYYY-MM-DD).
    #[serde(default)]
    pub start_date: Option<String>,
    /// Exclusive end date (YYYY-MM-DD).
    #[serde(default)]
    pub end_date: Option<String>,
    /// Rebalancing frequency: "weekly", "monthly" or "quarterly".
    #[serde(default = "default_frequency")]
    pub frequency: String,
    /// Cash invested at the start.
    #[serde(default = "default_cash")]
    pub initial_cash: f64,
    /// Weighting strategies to compare. Unrecognized names fall back to
    /// equal weight.
    #[serde(default)]
    pub strategies: Vec<String>,
}

fn default_frequency() -> String {
    "monthly".to_string()
}

fn default_cash() -> f64 {
    100_000.0
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            start_date: None,
            end_date: None,
            frequency: default_frequency(),
            initial_cash: default_cash(),
            strategies: Vec::new(),
        }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Path to a wide CSV of adjusted closes.
    pub path: Option<String>,
    /// Date format of the CSV date column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: None,
            date_format: default_date_format(),
        }
    }
}

impl SimulationFileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let config: SimulationFileConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| RebalError::ConfigError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert to a request for the engine.
    pub fn to_request(&self) -> Result<SimulationRequest> {
        let start_date = self
            .simulation
            .start_date
            .as_deref()
            .ok_or_else(|| RebalError::ConfigError("missing simulation.start_date".to_string()))?;
        let end_date = self
            .simulation
            .end_date
            .as_deref()
            .ok_or_else(|| RebalError::ConfigError("missing simulation.end_date".to_string()))?;

        let frequency = Frequency::from_name(&self.simulation.frequency).ok_or_else(|| {
            RebalError::ConfigError(format!(
                "unknown frequency {:?} (expected weekly, monthly or quarterly)",
                self.simulation.frequency
            ))
        })?;

        Ok(SimulationRequest {
            tickers: self.simulation.tickers.clone(),
            start_date: NaiveDate::parse_from_str(start_date, "%Y-%m-%d")?,
            end_date: NaiveDate::parse_from_str(end_date, "%Y-%m-%d")?,
            frequency,
            initial_cash: self.simulation.initial_cash,
            strategies: self
                .simulation
                .strategies
                .iter()
                .map(|name| WeightStrategy::from_name(name))
                .collect(),
        })
    }

    /// Generate an example configuration file content.
    pub fn example() -> String {
        r#"# Rebal configuration file
# Simulates the selected weighting strategies over a shared price history.

[simulation]
tickers = ["AAPL", "MSFT", "NVDA"]
start_date = "2023-01-01"
end_date = "2024-01-01"
frequency = "monthly"        # weekly | monthly | quarterly
initial_cash = 100000.0
strategies = ["equal-weight", "risk-parity", "risk-allocation", "momentum"]

[data]
path = "data/prices.csv"
date_format = "%Y-%m-%d"
"#
        .to_string()
    }
}
