use crate::PriceProvider;
use crate::error::ApiError;
use core_types::{DateRange, PriceTable, Ticker};
use futures::future::try_join_all;

/// Fetches every ticker concurrently and outer-joins the results on date.
///
/// Columns keep the order of `tickers`. The first failing fetch fails the
/// whole load; a partial table is never returned.
pub async fn load_price_table(
    provider: &dyn PriceProvider,
    tickers: &[Ticker],
    range: DateRange,
) -> Result<PriceTable, ApiError> {
    tracing::info!(
        count = tickers.len(),
        start = %range.start,
        end = %range.end,
        "Loading price history."
    );

    let series = try_join_all(
        tickers
            .iter()
            .map(|ticker| provider.fetch_adjusted_close(ticker, &range)),
    )
    .await?;

    for s in &series {
        tracing::debug!(ticker = %s.ticker(), points = s.len(), "Series received.");
    }

    let table = PriceTable::from_series(series)?;
    tracing::info!(rows = table.len(), columns = table.tickers().len(), "Price table built.");
    Ok(table)
}
