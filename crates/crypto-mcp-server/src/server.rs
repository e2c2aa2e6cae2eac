//! MCP server handler
//!
//! `rmcp` owns the wire protocol (JSON-RPC framing, `initialize`
//! negotiation, `ping`, notifications); this handler only answers the tool
//! requests. Stdout belongs to the protocol, so nothing else may write to it.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorData, ListToolsResult, PaginatedRequestParam,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};

use crate::handlers;
use crate::state::AppState;

/// Serves the tool registry over MCP
#[derive(Clone)]
pub struct CryptoServer {
    state: AppState,
}

impl CryptoServer {
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl ServerHandler for CryptoServer {
    fn get_info(&self) -> ServerInfo {
        handlers::server_info(&self.state)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(handlers::list_tools(
            &self.state,
        )))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        handlers::call_tool(&self.state, request).await
    }
}
