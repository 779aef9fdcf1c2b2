//! Core data types for the rebalancing simulator.

use crate::analytics;
use crate::error::{RebalError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observation: adjusted close prices for every ticker on one date.
///
/// `closes[i]` is aligned with the owning table's `tickers[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub closes: Vec<f64>,
}

impl PriceRow {
    pub fn new(date: NaiveDate, closes: Vec<f64>) -> Self {
        Self { date, closes }
    }
}

/// An ordered table of adjusted close prices, one column per ticker.
///
/// Invariants enforced at construction: at least one ticker, every row has
/// one close per ticker, and dates are strictly ascending (which also rules
/// out duplicate dates). A history with zero rows is valid and represents
/// the "no data retrieved" case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    tickers: Vec<String>,
    rows: Vec<PriceRow>,
}

impl PriceHistory {
    /// Create a price history, validating the table invariants.
    pub fn new(tickers: Vec<String>, rows: Vec<PriceRow>) -> Result<Self> {
        if tickers.is_empty() {
            return Err(RebalError::DataError(
                "price history requires at least one ticker".to_string(),
            ));
        }

        for row in &rows {
            if row.closes.len() != tickers.len() {
                return Err(RebalError::DataError(format!(
                    "row {} has {} values, expected {}",
                    row.date,
                    row.closes.len(),
                    tickers.len()
                )));
            }
        }

        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(RebalError::DataError(format!(
                    "dates must be strictly ascending: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        Ok(Self { tickers, rows })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// First observation date, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    /// Last observation date, if any.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// All observation dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Divide every row by the first row so each column starts at 1.0.
    ///
    /// Fails if the history is empty or any first-row price is zero.
    pub fn normalized(&self) -> Result<PriceHistory> {
        let baseline = self
            .rows
            .first()
            .ok_or(RebalError::NoData)?
            .closes
            .clone();

        if let Some(i) = baseline.iter().position(|&p| p == 0.0) {
            return Err(RebalError::DataError(format!(
                "cannot normalize: first price for {} is zero",
                self.tickers[i]
            )));
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let closes = row
                    .closes
                    .iter()
                    .zip(&baseline)
                    .map(|(&p, &base)| p / base)
                    .collect();
                PriceRow::new(row.date, closes)
            })
            .collect();

        PriceHistory::new(self.tickers.clone(), rows)
    }

    /// Period-over-period percentage change over rows with date <= `through`.
    ///
    /// The first observation has no defined change and is dropped, so a
    /// single-row prefix yields an empty window.
    pub fn returns_through(&self, through: NaiveDate) -> ReturnsWindow {
        let cut = self.rows.partition_point(|r| r.date <= through);
        let rows = self.rows[..cut]
            .windows(2)
            .map(|pair| {
                let closes = pair[1]
                    .closes
                    .iter()
                    .zip(&pair[0].closes)
                    .map(|(&curr, &prev)| curr / prev - 1.0)
                    .collect();
                PriceRow::new(pair[1].date, closes)
            })
            .collect();

        ReturnsWindow {
            tickers: self.tickers.clone(),
            rows,
        }
    }

    /// Percentage change over the full history.
    pub fn returns(&self) -> ReturnsWindow {
        match self.end_date() {
            Some(last) => self.returns_through(last),
            None => ReturnsWindow {
                tickers: self.tickers.clone(),
                rows: Vec::new(),
            },
        }
    }

    /// The latest row with date <= `date`, if one exists.
    pub fn row_at_or_before(&self, date: NaiveDate) -> Option<&PriceRow> {
        let cut = self.rows.partition_point(|r| r.date <= date);
        if cut == 0 {
            None
        } else {
            Some(&self.rows[cut - 1])
        }
    }

    /// Restrict the table to the given tickers, preserving their order.
    pub fn select(&self, tickers: &[String]) -> Result<PriceHistory> {
        let indices: Vec<usize> = tickers
            .iter()
            .map(|t| {
                self.tickers
                    .iter()
                    .position(|have| have == t)
                    .ok_or_else(|| {
                        RebalError::DataError(format!("ticker {} not present in data", t))
                    })
            })
            .collect::<Result<_>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let closes = indices.iter().map(|&i| row.closes[i]).collect();
                PriceRow::new(row.date, closes)
            })
            .collect();

        PriceHistory::new(tickers.to_vec(), rows)
    }

    /// Restrict the table to dates in `[start, end)`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<PriceHistory> {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.date >= start && r.date < end)
            .cloned()
            .collect();

        PriceHistory::new(self.tickers.clone(), rows)
    }
}

/// A window of period-over-period returns, recomputed at every rebalance
/// step from the prefix of normalized prices up to the current date.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsWindow {
    tickers: Vec<String>,
    rows: Vec<PriceRow>,
}

impl ReturnsWindow {
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// The most recent row of returns, if any.
    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows.last().map(|r| r.closes.as_slice())
    }

    /// Sample standard deviation of one ticker's returns over the window.
    ///
    /// Windows with fewer than two rows have no defined dispersion and
    /// report 0.0.
    pub fn column_stdev(&self, column: usize) -> f64 {
        let values: Vec<f64> = self.rows.iter().map(|r| r.closes[column]).collect();
        analytics::stdev(&values)
    }
}

/// One non-negative weight per ticker, in the same ticker order as the
/// price history it was computed from.
///
/// The unit-sum invariant is enforced by the simulator's post-processing
/// step, not by this type: the evaluator intentionally hands back raw
/// strategy weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    /// The equal-weight vector: every component 1/n.
    pub fn equal(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}
