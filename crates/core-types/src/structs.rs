use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stock symbol identifying a tradable security (e.g., "AAPL").
///
/// Tickers are trimmed and upper-cased on construction, so `" msft"` and
/// `"MSFT"` name the same column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Result<Self, CoreError> {
        let normalized = symbol.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(CoreError::InvalidInput(
                "ticker".to_string(),
                "symbol must not be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl FromStr for Ticker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Adjusted closing prices for a single ticker, keyed by trading date.
///
/// Dates are strictly ascending; a series can never hold two prices for the
/// same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: Ticker,
    points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Builds a series from unordered observations.
    ///
    /// Returns `CoreError::DuplicateDate` if two observations share a date.
    pub fn new(ticker: Ticker, mut points: Vec<(NaiveDate, f64)>) -> Result<Self, CoreError> {
        points.sort_by_key(|(date, _)| *date);
        if let Some(pair) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CoreError::DuplicateDate {
                ticker: ticker.to_string(),
                date: pair[0].0,
            });
        }
        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(date, _)| *date)
    }

    /// Looks up the price recorded on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Returns a copy of the series restricted to `range`.
    pub fn restrict(&self, range: &DateRange) -> Self {
        Self {
            ticker: self.ticker.clone(),
            points: self
                .points
                .iter()
                .filter(|(date, _)| range.contains(*date))
                .copied()
                .collect(),
        }
    }
}
