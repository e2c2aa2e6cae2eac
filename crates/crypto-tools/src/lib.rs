//! # crypto-tools
//!
//! Read-only CoinCap lookups exposed as agent tools:
//!
//! | tool | upstream | argument |
//! |------|----------|----------|
//! | `get-exchange-details` | `GET /exchanges/{id}` | `exchange` |
//! | `get-rates` | `GET /rates/{id}` | `currency` |
//!
//! ## Request flow
//!
//! ```text
//! ToolCall ──▶ normalize id ──▶ CoinCapClient ──▶ HttpTransport
//!                                   │  429? sleep 1s, 2s, 3s and retry
//!                                   ▼
//!              ToolResult ◀── format ◀── Envelope { data }
//! ```
//!
//! Upstream failures never reach the host: they are logged and rendered as a
//! plain "Failed to retrieve ..." message.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod svckit;
pub mod upstream;

pub use config::CoinCapConfig;
pub use error::{FetchError, Result, ToolsError};
pub use model::{Envelope, ExchangeRecord, RateRecord};
pub use upstream::{CoinCapClient, FetchPolicy, HttpTransport};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{register_all, ExchangeDetailsTool, RatesTool};
}
