use crate::error::CoreError;
use crate::structs::{PriceSeries, Ticker};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Range;

/// A date-indexed table holding one price column per tracked ticker.
///
/// The index is the sorted union of every column's dates. A ticker that has
/// no observation on an index date holds `None` in that row, so all columns
/// always share the same length as the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<Ticker>,
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Outer-joins several series on their dates, keeping the order in which
    /// the series are given as the column order.
    pub fn from_series(series: Vec<PriceSeries>) -> Result<Self, CoreError> {
        let mut tickers: Vec<Ticker> = Vec::with_capacity(series.len());
        for s in &series {
            if tickers.contains(s.ticker()) {
                return Err(CoreError::DuplicateTicker(s.ticker().to_string()));
            }
            tickers.push(s.ticker().clone());
        }

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.dates())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = series
            .iter()
            .map(|s| dates.iter().map(|date| s.get(*date)).collect())
            .collect();

        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Builds a table from raw parts, checking that the index is strictly
    /// ascending and every column matches its length.
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<Ticker>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if tickers.len() != columns.len() {
            return Err(CoreError::InvalidInput(
                "price table".to_string(),
                format!("{} tickers but {} columns", tickers.len(), columns.len()),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidInput(
                "price table".to_string(),
                "date index must be strictly ascending".to_string(),
            ));
        }
        if let Some((ticker, column)) = tickers
            .iter()
            .zip(columns.iter())
            .find(|(_, column)| column.len() != dates.len())
        {
            return Err(CoreError::InvalidInput(
                "price table".to_string(),
                format!(
                    "column {ticker} has {} rows, index has {}",
                    column.len(),
                    dates.len()
                ),
            ));
        }
        for (i, ticker) in tickers.iter().enumerate() {
            if tickers[..i].contains(ticker) {
                return Err(CoreError::DuplicateTicker(ticker.to_string()));
            }
        }
        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn position(&self, ticker: &Ticker) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn column(&self, ticker: &Ticker) -> Option<&[Option<f64>]> {
        self.position(ticker).map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&Ticker, &[Option<f64>])> {
        self.tickers
            .iter()
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Builds a table with the same index and tickers whose columns are
    /// `f` applied to each of this table's columns.
    ///
    /// `f` must preserve the column length.
    pub fn map_columns(&self, f: impl Fn(&[Option<f64>]) -> Vec<Option<f64>>) -> Self {
        let columns: Vec<Vec<Option<f64>>> = self.columns.iter().map(|c| f(c.as_slice())).collect();
        debug_assert!(columns.iter().all(|c| c.len() == self.dates.len()));
        Self {
            dates: self.dates.clone(),
            tickers: self.tickers.clone(),
            columns,
        }
    }

    /// Returns a new table holding only the rows in `rows`.
    ///
    /// The range is clamped to the table length.
    pub fn slice_rows(&self, rows: Range<usize>) -> Self {
        let end = rows.end.min(self.len());
        let start = rows.start.min(end);
        Self {
            dates: self.dates[start..end].to_vec(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| column[start..end].to_vec())
                .collect(),
        }
    }
}
