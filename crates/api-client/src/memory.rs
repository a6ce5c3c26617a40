use crate::PriceProvider;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{DateRange, PriceSeries, Ticker};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `PriceProvider` serving fixed series from memory.
///
/// Backs offline runs (see `from_file`) and the tests. Every call is counted
/// so callers can assert how many fetches an operation triggered.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    series: HashMap<Ticker, PriceSeries>,
    requests: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|s| (s.ticker().clone(), s))
                .collect(),
            requests: AtomicUsize::new(0),
        }
    }

    /// Parses a fixture document: a JSON object mapping each symbol to its
    /// `["YYYY-MM-DD", price]` pairs, e.g. `{"IBM": [["2017-03-01", 180.5]]}`.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let fixture: BTreeMap<String, Vec<(NaiveDate, f64)>> =
            serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

        let series = fixture
            .into_iter()
            .map(|(symbol, points)| -> Result<PriceSeries, ApiError> {
                Ok(PriceSeries::new(Ticker::new(&symbol)?, points)?)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(series))
    }

    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let provider = Self::from_json(&std::fs::read_to_string(path)?)?;
        tracing::info!(
            path = %path.display(),
            tickers = provider.series.len(),
            "Serving prices from fixture file."
        );
        Ok(provider)
    }

    /// Number of `fetch_adjusted_close` calls served so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PriceProvider for InMemoryProvider {
    async fn fetch_adjusted_close(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, ApiError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.series
            .get(ticker)
            .map(|series| series.restrict(range))
            .ok_or_else(|| ApiError::UnknownSymbol(ticker.to_string(), "not in fixture".to_string()))
    }
}
