use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Ticker '{0}' is not part of the price table")]
    UnknownTicker(String),

    #[error("Row {index} is out of range for a table of {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Malformed long-form data: {0}")]
    MalformedLongForm(String),

    #[error("Invalid correlation matrix: {0}")]
    InvalidMatrix(String),
}
