use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Duplicate date {date} in price series for {ticker}")]
    DuplicateDate { ticker: String, date: chrono::NaiveDate },

    #[error("Ticker '{0}' appears more than once in the table")]
    DuplicateTicker(String),
}
