use core_types::PriceTable;

/// A table with the same shape as its price table whose cells hold
/// period-over-period returns instead of prices.
pub type ReturnsTable = PriceTable;

/// Simple percentage change: `price[t] / price[t-1] - 1`.
///
/// The first row, and any row where the current or previous price is
/// missing (or the previous price is zero), is `None`.
pub fn pct_change(column: &[Option<f64>]) -> Vec<Option<f64>> {
    lagged(column, |prev, cur| (prev != 0.0).then(|| cur / prev - 1.0))
}

/// First difference: `price[t] - price[t-1]`.
pub fn diff(column: &[Option<f64>]) -> Vec<Option<f64>> {
    lagged(column, |prev, cur| Some(cur - prev))
}

fn lagged(column: &[Option<f64>], f: impl Fn(f64, f64) -> Option<f64>) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(column.len());
    if column.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(column.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(cur)) => f(prev, cur),
        _ => None,
    }));
    out
}

/// Converts every column of a (sliced) price table to percentage returns.
///
/// Percentage change is the single returns definition of the rolling
/// correlation pipeline.
pub fn returns_table(prices: &PriceTable) -> ReturnsTable {
    prices.map_columns(pct_change)
}
