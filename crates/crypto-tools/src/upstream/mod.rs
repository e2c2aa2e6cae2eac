//! CoinCap Upstream
//!
//! One fetch policy for every call to the CoinCap API. Requests go through a
//! pluggable [`HttpTransport`] so the retry loop can be exercised without a
//! network.
//!
//! Retry rules:
//! - HTTP 429 is retried up to `max_retries` times, sleeping
//!   `base_delay * n` before retry `n` (1s, 2s, 3s by default).
//! - Any other failure ([`FetchError::is_retryable`] is false) ends the
//!   sequence at once.
//! - The whole sequence, sleeps included, runs under the policy deadline.

mod http;
mod mock;

pub use http::ReqwestTransport;
pub use mock::{MockReply, MockTransport, RecordedCall};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{CoinCapConfig, DEFAULT_USER_AGENT};
use crate::error::{FetchError, Result, ToolsError};

const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Status and body of a completed HTTP exchange
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP status level (connect, timeout, body read)
///
/// A 429 always arrives as a [`RawResponse`], never as one of these.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// HTTP transport (Strategy pattern)
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request with the given headers
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> std::result::Result<RawResponse, TransportError>;
}

/// Headers and retry behaviour applied to every request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Sent as `User-Agent` when set
    pub user_agent: Option<String>,

    /// Additional attempts allowed after a 429
    pub max_retries: u32,

    /// Linear backoff step
    pub base_delay: Duration,

    /// Upper bound on the whole fetch, retries included
    pub deadline: Option<Duration>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::retrying()
    }
}

impl FetchPolicy {
    /// Identify ourselves and retry 429s three times (1s, 2s, 3s)
    pub fn retrying() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.into()),
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            deadline: None,
        }
    }

    /// `Accept` header only, first failure is final
    pub const fn simple() -> Self {
        Self {
            user_agent: None,
            max_retries: 0,
            base_delay: Duration::ZERO,
            deadline: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub const fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Delay before retry `n` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(agent) = &self.user_agent {
            headers.push(("User-Agent", agent.clone()));
        }
        headers.push(("Accept", "application/json".to_string()));
        headers
    }
}

/// CoinCap API client
#[derive(Clone)]
pub struct CoinCapClient {
    transport: Arc<dyn HttpTransport>,
    base: Url,
    policy: FetchPolicy,
}

impl std::fmt::Debug for CoinCapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinCapClient")
            .field("base", &self.base.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CoinCapClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        policy: FetchPolicy,
    ) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ToolsError::Config(format!("invalid API base '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ToolsError::Config(format!(
                "API base '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            transport,
            base,
            policy,
        })
    }

    /// Real client backed by `reqwest`
    pub fn from_config(config: &CoinCapConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::new(Arc::new(transport), &config.base_url, config.policy())
    }

    pub const fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Base URL with each segment appended (and percent-encoded)
    pub fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    /// GET `{base}/{segments...}` and decode the JSON body
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> std::result::Result<T, FetchError> {
        let url = self.endpoint(segments);

        match self.policy.deadline {
            Some(limit) => tokio::time::timeout(limit, self.fetch_with_retry(&url))
                .await
                .unwrap_or(Err(FetchError::DeadlineExceeded(limit))),
            None => self.fetch_with_retry(&url).await,
        }
    }

    /// Like [`fetch_json`](Self::fetch_json) but logs the failure and
    /// returns `None` in its place
    pub async fn fetch_json_opt<T: DeserializeOwned>(&self, segments: &[&str]) -> Option<T> {
        match self.fetch_json(segments).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = ?segments, error = ?e, "Error making CoinCap request: {}", e);
                None
            }
        }
    }

    async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> std::result::Result<T, FetchError> {
        let headers = self.policy.headers();
        let mut retries = 0;

        loop {
            tracing::debug!(url, attempt = retries + 1, "Sending CoinCap request");

            let error = match self.transport.get(url, &headers).await {
                Ok(response) if response.status == STATUS_TOO_MANY_REQUESTS => {
                    FetchError::RateLimited {
                        attempts: retries + 1,
                    }
                }
                Ok(response) if !(200..300).contains(&response.status) => FetchError::Http {
                    status: response.status,
                },
                Ok(response) => {
                    return serde_json::from_str(&response.body)
                        .map_err(|e| FetchError::Decode(e.to_string()));
                }
                Err(e) => FetchError::Transport(e.message),
            };

            if !error.is_retryable() || retries >= self.policy.max_retries {
                return Err(error);
            }

            retries += 1;
            let delay = self.policy.delay_for(retries);
            tracing::warn!(
                "Rate limited by CoinCap API. Retry attempt {}/{} after {:?} delay",
                retries,
                self.policy.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
