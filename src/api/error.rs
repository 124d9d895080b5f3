use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the listings backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// Body arrived but does not have the expected shape
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }
}
