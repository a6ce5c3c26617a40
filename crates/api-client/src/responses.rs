use serde::Deserialize;

// Schema of `GET /v8/finance/chart/{ticker}`. Only the fields we read are modelled;
// the API returns `null` for days without a value, hence the `Option`s.

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartResponse,
}

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Unix timestamps (seconds) of each trading session.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}
