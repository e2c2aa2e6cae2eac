//! CoinCap client configuration

use std::time::Duration;

use crate::error::{Result, ToolsError};
use crate::upstream::FetchPolicy;

pub const DEFAULT_API_BASE: &str = "https://api.coincap.io/v2";
pub const DEFAULT_USER_AGENT: &str = "realtime-crypto-app/1.0";

/// CoinCap client configuration
#[derive(Clone, Debug)]
pub struct CoinCapConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Retry on HTTP 429
    pub retry: bool,

    /// Additional attempts after the first rate-limited one
    pub max_retries: u32,

    /// Base backoff delay in milliseconds (delay n = base * n)
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Upper bound on a whole fetch including retries, in seconds (0 = none)
    pub deadline_secs: u64,
}

impl Default for CoinCapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            retry: true,
            max_retries: 3,
            retry_delay_ms: 1000,
            timeout_secs: 10,
            deadline_secs: 30,
        }
    }
}

impl CoinCapConfig {
    /// Read overrides from `COINCAP_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let base_url = lookup("COINCAP_API_BASE")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ToolsError::Config(format!(
                "COINCAP_API_BASE must be an http(s) URL, got '{base_url}'"
            )));
        }

        Ok(Self {
            base_url,
            user_agent: lookup("COINCAP_USER_AGENT").unwrap_or(defaults.user_agent),
            retry: parse_var(&lookup, "COINCAP_RETRY", defaults.retry)?,
            max_retries: parse_var(&lookup, "COINCAP_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: parse_var(&lookup, "COINCAP_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            timeout_secs: parse_var(&lookup, "COINCAP_TIMEOUT_SECS", defaults.timeout_secs)?,
            deadline_secs: parse_var(&lookup, "COINCAP_DEADLINE_SECS", defaults.deadline_secs)?,
        })
    }

    /// Fetch policy described by this configuration
    pub fn policy(&self) -> FetchPolicy {
        let policy = if self.retry {
            FetchPolicy::retrying()
                .with_user_agent(self.user_agent.clone())
                .with_retries(self.max_retries, Duration::from_millis(self.retry_delay_ms))
        } else {
            FetchPolicy::simple()
        };

        let deadline = (self.deadline_secs > 0).then(|| Duration::from_secs(self.deadline_secs));
        policy.with_deadline(deadline)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ToolsError::Config(format!("{key}='{raw}': {e}"))),
        None => Ok(default),
    }
}
