//! Price history loading from wide CSV files.
//!
//! Expected layout: a date column followed by one adjusted-close column
//! per ticker, with the ticker names in the header row:
//!
//! ```csv
//! date,AAPL,MSFT,NVDA
//! 2024-01-02,185.64,370.87,481.68
//! 2024-01-03,184.25,370.60,475.69
//! ```

use crate::engine::PriceProvider;
use crate::error::{RebalError, Result};
use crate::types::{PriceHistory, PriceRow};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{info, warn};

/// CSV parsing options.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Date format for the first column.
    pub date_format: String,
    /// Field delimiter.
    pub delimiter: u8,
    /// Skip rows that fail to parse instead of failing the whole load.
    pub skip_invalid: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
            skip_invalid: false,
        }
    }
}

/// Load a wide CSV of adjusted closes into a [`PriceHistory`].
///
/// Rows are sorted by date after parsing; duplicate dates are rejected by
/// the `PriceHistory` constructor.
pub fn load_csv(path: impl AsRef<Path>, config: &CsvConfig) -> Result<PriceHistory> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(RebalError::DataError(format!(
            "{}: expected a date column and at least one ticker column",
            path.display()
        )));
    }
    let tickers: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        match parse_row(&record, &tickers, &config.date_format) {
            Ok(row) => rows.push(row),
            Err(e) if config.skip_invalid => {
                warn!("{}: skipping row {}: {}", path.display(), line + 2, e);
            }
            Err(e) => return Err(e),
        }
    }

    rows.sort_by_key(|r| r.date);
    let history = PriceHistory::new(tickers, rows)?;
    info!(
        "loaded {} observations of {} tickers from {}",
        history.len(),
        history.num_tickers(),
        path.display()
    );
    Ok(history)
}

fn parse_row(record: &csv::StringRecord, tickers: &[String], date_format: &str) -> Result<PriceRow> {
    if record.len() != tickers.len() + 1 {
        return Err(RebalError::DataError(format!(
            "expected {} fields, found {}",
            tickers.len() + 1,
            record.len()
        )));
    }

    let date = NaiveDate::parse_from_str(&record[0], date_format)?;
    let closes = record
        .iter()
        .skip(1)
        .zip(tickers)
        .map(|(field, ticker)| {
            field.parse::<f64>().map_err(|_| {
                RebalError::DataError(format!("invalid price {:?} for {} on {}", field, ticker, date))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(PriceRow::new(date, closes))
}

/// File-backed price provider: a loaded history served by ticker selection
/// and date-range filtering.
pub struct CsvProvider {
    history: PriceHistory,
}

impl CsvProvider {
    pub fn new(history: PriceHistory) -> Self {
        Self { history }
    }

    pub fn from_path(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Self> {
        Ok(Self::new(load_csv(path, config)?))
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }
}

impl PriceProvider for CsvProvider {
    fn fetch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory> {
        self.history.select(tickers)?.between(start, end)
    }
}
