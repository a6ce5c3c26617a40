use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ProviderConfig;
use core_types::{DateRange, PriceSeries, Ticker};
use std::sync::Arc;

pub mod error;
pub mod loader;
pub mod memory;
pub mod responses;
pub mod yahoo;

// --- Public API ---
pub use loader::load_price_table;
pub use memory::InMemoryProvider;
pub use yahoo::YahooClient;

/// The abstract interface for a historical price provider.
/// The dashboards only depend on this trait, allowing the underlying
/// implementation (live API or in-memory fixture) to be swapped out.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the adjusted closing prices of `ticker` for every trading
    /// day in `range`.
    async fn fetch_adjusted_close(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, ApiError>;
}

/// Builds the provider the configuration asks for: the fixture file when
/// `fixtures` is set, the live API otherwise.
pub fn from_config(config: &ProviderConfig) -> Result<Arc<dyn PriceProvider>, ApiError> {
    match &config.fixtures {
        Some(path) => Ok(Arc::new(InMemoryProvider::from_file(path)?)),
        None => Ok(Arc::new(YahooClient::new(config)?)),
    }
}
