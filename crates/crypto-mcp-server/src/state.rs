//! Application State

use std::sync::Arc;

use agent_core::ToolRegistry;

pub const SERVER_NAME: &str = "realtime-crypto";

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Tool registry with all available tools
    pub tools: Arc<ToolRegistry>,

    /// Name reported in `serverInfo`
    pub name: &'static str,

    /// Version reported in `serverInfo`
    pub version: &'static str,
}

impl AppState {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools: Arc::new(tools),
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
