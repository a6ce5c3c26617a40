use crate::error::AnalyticsError;
use crate::returns::diff;
use chrono::NaiveDate;
use core_types::{PriceTable, Ticker};
use serde::Serialize;

/// Two tickers side by side: prices and first-difference returns, restricted
/// to the dates on which all four values are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairTable {
    pub first: Ticker,
    pub second: Ticker,
    pub dates: Vec<NaiveDate>,
    pub first_prices: Vec<f64>,
    pub second_prices: Vec<f64>,
    pub first_returns: Vec<f64>,
    pub second_returns: Vec<f64>,
}

impl PairTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column labels, in the order `columns` returns them.
    pub fn column_names(&self) -> [String; 4] {
        [
            self.first.to_string(),
            self.second.to_string(),
            format!("{}_returns", self.first),
            format!("{}_returns", self.second),
        ]
    }

    pub fn columns(&self) -> [&[f64]; 4] {
        [
            self.first_prices.as_slice(),
            self.second_prices.as_slice(),
            self.first_returns.as_slice(),
            self.second_returns.as_slice(),
        ]
    }
}

/// Joins the columns of `first` and `second` from the full price table.
///
/// Returns are the first difference of each ticker's full column, computed
/// before the join, so the earliest date never survives and a gap in either
/// ticker drops the row after it as well.
pub fn align_pair(
    table: &PriceTable,
    first: &Ticker,
    second: &Ticker,
) -> Result<PairTable, AnalyticsError> {
    let first_col = table
        .column(first)
        .ok_or_else(|| AnalyticsError::UnknownTicker(first.to_string()))?;
    let second_col = table
        .column(second)
        .ok_or_else(|| AnalyticsError::UnknownTicker(second.to_string()))?;
    let first_diff = diff(first_col);
    let second_diff = diff(second_col);

    let mut pair = PairTable {
        first: first.clone(),
        second: second.clone(),
        dates: Vec::new(),
        first_prices: Vec::new(),
        second_prices: Vec::new(),
        first_returns: Vec::new(),
        second_returns: Vec::new(),
    };

    for (row, date) in table.dates().iter().enumerate() {
        if let (Some(p1), Some(p2), Some(r1), Some(r2)) = (
            first_col[row],
            second_col[row],
            first_diff[row],
            second_diff[row],
        ) {
            pair.dates.push(*date);
            pair.first_prices.push(p1);
            pair.second_prices.push(p2);
            pair.first_returns.push(r1);
            pair.second_returns.push(r2);
        }
    }

    tracing::debug!(%first, %second, rows = pair.len(), "Pair aligned.");
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PriceSeries;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 6, day).unwrap()
    }

    fn ticker(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    fn table() -> PriceTable {
        PriceTable::from_series(vec![
            PriceSeries::new(
                ticker("AMZN"),
                vec![(d(1), 700.0), (d(2), 705.0), (d(3), 702.0), (d(6), 710.0), (d(7), 715.0)],
            )
            .unwrap(),
            PriceSeries::new(
                ticker("GOOG"),
                vec![(d(1), 720.0), (d(2), 718.0), (d(6), 725.0), (d(7), 730.0)],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn rows_with_any_gap_are_dropped() {
        let pair = align_pair(&table(), &ticker("AMZN"), &ticker("GOOG")).unwrap();

        // d(1) has no prior price, d(3) has no GOOG, d(6) has no GOOG predecessor.
        assert_eq!(pair.dates, vec![d(2), d(7)]);
        assert_eq!(pair.first_prices, vec![705.0, 715.0]);
        assert_eq!(pair.second_returns, vec![-2.0, 5.0]);
        assert_eq!(pair.first_returns, vec![5.0, 5.0]);
    }

    #[test]
    fn row_count_is_bounded_by_shorter_series() {
        let t = table();
        let pair = align_pair(&t, &ticker("GOOG"), &ticker("AMZN")).unwrap();
        assert!(pair.len() <= 4);
        for column in pair.columns() {
            assert_eq!(column.len(), pair.len());
            assert!(column.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn alignment_is_deterministic() {
        let t = table();
        let a = align_pair(&t, &ticker("AMZN"), &ticker("GOOG")).unwrap();
        let b = align_pair(&t, &ticker("AMZN"), &ticker("GOOG")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_ticker_is_an_error() {
        let result = align_pair(&table(), &ticker("AMZN"), &ticker("VZ"));
        assert_eq!(result, Err(AnalyticsError::UnknownTicker("VZ".to_string())));
    }

    #[test]
    fn column_names_follow_the_selection() {
        let pair = align_pair(&table(), &ticker("AMZN"), &ticker("GOOG")).unwrap();
        assert_eq!(pair.column_names()[2], "AMZN_returns");
    }
}
