//! Error Types for the CoinCap tools

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolsError>;

/// Outcome of a failed upstream fetch
///
/// Every variant collapses into the same "unavailable" text for the end user;
/// the variant itself is what gets logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Request did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl FetchError {
    /// Only rate limiting is worth retrying
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[derive(Error, Debug)]
pub enum ToolsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
