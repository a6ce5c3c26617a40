use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unknown symbol '{0}': {1}")]
    UnknownSymbol(String, String),

    #[error("The API request returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Failed to read price fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] core_types::CoreError),
}
