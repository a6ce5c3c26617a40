use core_types::Slot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::error::ConfigError),

    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::error::ApiError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error(transparent)]
    Core(#[from] core_types::CoreError),

    #[error("Ticker '{ticker}' cannot be selected as {slot:?}: it is already selected in the other dropdown.")]
    SelectionConflict { slot: Slot, ticker: String },

    #[error("Ticker '{0}' is not part of this dashboard.")]
    UnknownTicker(String),

    #[error("Cursor index {index} is out of range (0..{len}).")]
    CursorOutOfRange { index: usize, len: usize },

    #[error("The price table has no trading dates.")]
    EmptyTable,
}
