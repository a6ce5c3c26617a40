use crate::error::ApiError;
use crate::responses::{ChartEnvelope, ChartResult};
use crate::PriceProvider;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use configuration::ProviderConfig;
use core_types::{DateRange, PriceSeries, Ticker};
use reqwest::StatusCode;
use std::collections::BTreeMap;

/// A `PriceProvider` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn fetch_adjusted_close(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        // `period2` is exclusive, so ask for midnight after the last day.
        let period1 = midnight_utc(range.start);
        let period2 = midnight_utc(range.end.checked_add_days(Days::new(1)).unwrap_or(range.end));

        tracing::debug!(%ticker, %url, period1, period2, "Requesting price history.");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(unknown_symbol(ticker, &text));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_chart(ticker, &text).map(|series| series.restrict(range))
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

fn unknown_symbol(ticker: &Ticker, body: &str) -> ApiError {
    let description = serde_json::from_str::<ChartEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.chart.error)
        .map(|error| error.description)
        .unwrap_or_else(|| "symbol not found".to_string());
    ApiError::UnknownSymbol(ticker.to_string(), description)
}

/// Converts a chart response body into a price series of adjusted closes.
///
/// Days with a `null` price are skipped. If the API repeats a day (it does for
/// the live session), the last value wins.
pub fn parse_chart(ticker: &Ticker, body: &str) -> Result<PriceSeries, ApiError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        return Err(ApiError::UnknownSymbol(
            ticker.to_string(),
            format!("{}: {}", error.code, error.description),
        ));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::UnknownSymbol(ticker.to_string(), "empty chart result".to_string()))?;

    let prices = adjusted_prices(ticker, &result)?;
    if prices.len() != result.timestamp.len() {
        return Err(ApiError::InvalidData(format!(
            "{ticker}: {} timestamps but {} prices",
            result.timestamp.len(),
            prices.len()
        )));
    }

    let mut by_date = BTreeMap::new();
    for (ts, price) in result.timestamp.iter().zip(prices) {
        let Some(price) = *price else { continue };
        let date = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| ApiError::InvalidData(format!("{ticker}: invalid timestamp {ts}")))?
            .date_naive();
        by_date.insert(date, price);
    }

    Ok(PriceSeries::new(ticker.clone(), by_date.into_iter().collect())?)
}

fn adjusted_prices<'a>(ticker: &Ticker, result: &'a ChartResult) -> Result<&'a [Option<f64>], ApiError> {
    if let Some(adj) = result.indicators.adjclose.first() {
        return Ok(&adj.adjclose);
    }
    // Without dividend/split events some responses omit `adjclose`; the
    // plain close is then already the adjusted one.
    match result.indicators.quote.first() {
        Some(quote) => {
            tracing::warn!(%ticker, "No adjusted close in response, using close.");
            Ok(&quote.close)
        }
        None if result.timestamp.is_empty() => Ok(&[]),
        None => Err(ApiError::InvalidData(format!("{ticker}: response has no prices"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Ticker {
        Ticker::new("AAPL").unwrap()
    }

    // 2017-01-03, 2017-01-04 and 2017-01-05 at 14:30 UTC.
    const BODY: &str = r#"{"chart":{"result":[{
        "meta":{"symbol":"AAPL"},
        "timestamp":[1483453800,1483540200,1483626600],
        "indicators":{
            "quote":[{"close":[116.15,116.02,116.61]}],
            "adjclose":[{"adjclose":[110.95,null,111.39]}]
        }}],"error":null}}"#;

    #[test]
    fn parses_adjusted_close_and_skips_nulls() {
        let series = parse_chart(&aapl(), BODY).unwrap();
        let d = |day| NaiveDate::from_ymd_opt(2017, 1, day).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d(3)), Some(110.95));
        assert_eq!(series.get(d(4)), None);
        assert_eq!(series.get(d(5)), Some(111.39));
    }

    #[test]
    fn chart_error_is_unknown_symbol() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(&aapl(), body).unwrap_err();
        assert!(matches!(err, ApiError::UnknownSymbol(symbol, _) if symbol == "AAPL"));

        let err = unknown_symbol(&aapl(), body);
        assert!(err.to_string().contains("delisted"));
    }

    #[test]
    fn falls_back_to_close_without_adjclose() {
        let body = r#"{"chart":{"result":[{"timestamp":[1483453800],
            "indicators":{"quote":[{"close":[116.15]}]}}],"error":null}}"#;
        let series = parse_chart(&aapl(), body).unwrap();
        assert_eq!(series.points()[0].1, 116.15);
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        let body = r#"{"chart":{"result":[{"timestamp":[1483453800,1483540200],
            "indicators":{"adjclose":[{"adjclose":[1.0]}]}}],"error":null}}"#;
        assert!(matches!(parse_chart(&aapl(), body), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        assert!(matches!(parse_chart(&aapl(), "<html>"), Err(ApiError::Deserialization(_))));
    }

    #[test]
    fn period_bounds_are_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2017, 1, 3).unwrap();
        assert_eq!(midnight_utc(date), 1483401600);
    }
}
