//! MCP request handlers
//!
//! Maps the MCP tool surface onto the tool registry. Tool failures are
//! reported inside the call result (`isError`); protocol errors are reserved
//! for calls naming a tool that does not exist.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, ServerCapabilities,
    ServerInfo, Tool as McpTool,
};

use agent_core::{ToolCall, ToolResult};

use crate::state::AppState;

/// Identity and capabilities announced during `initialize`
pub fn server_info(state: &AppState) -> ServerInfo {
    let mut server_info = Implementation::from_build_env();
    server_info.name = state.name.into();
    server_info.version = state.version.into();

    ServerInfo {
        capabilities: ServerCapabilities::builder().enable_tools().build(),
        server_info,
        instructions: Some(
            "Realtime CoinCap lookups: exchange details and USD rates by id".into(),
        ),
        ..Default::default()
    }
}

/// Registered tools in MCP form, ordered by name
pub fn list_tools(state: &AppState) -> Vec<McpTool> {
    state
        .tools
        .schemas()
        .into_iter()
        .map(|schema| {
            let input_schema = Arc::new(schema.input_schema());
            McpTool::new(schema.name, schema.description, input_schema)
        })
        .collect()
}

pub async fn call_tool(
    state: &AppState,
    request: CallToolRequestParam,
) -> Result<CallToolResult, ErrorData> {
    if state.tools.get(&request.name).is_none() {
        tracing::warn!(tool = %request.name, "Call to unknown tool");
        return Err(ErrorData::invalid_params(
            format!("Unknown tool: {}", request.name),
            None,
        ));
    }

    let call = ToolCall {
        name: request.name.into_owned(),
        arguments: request.arguments.unwrap_or_default().into_iter().collect(),
        id: None,
    };

    tracing::info!(tool = %call.name, "Calling tool");
    Ok(into_call_result(state.tools.call(&call).await))
}

fn into_call_result(result: ToolResult) -> CallToolResult {
    let content = result
        .content
        .into_iter()
        .map(|item| match item {
            agent_core::Content::Text { text } => Content::text(text),
        })
        .collect();

    if result.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use agent_core::ToolRegistry;
    use crypto_tools::{
        tools::register_all,
        upstream::{MockReply, MockTransport},
        CoinCapClient, FetchPolicy,
    };
    use rmcp::model::ErrorCode;
    use serde_json::{json, Value};

    fn state_with(transport: MockTransport) -> AppState {
        let client =
            CoinCapClient::new(Arc::new(transport), "https://api.test/v2", FetchPolicy::retrying())
                .unwrap();
        let mut tools = ToolRegistry::new();
        register_all(&mut tools, &Arc::new(client));
        AppState::new(tools)
    }

    fn request(params: Value) -> CallToolRequestParam {
        serde_json::from_value(params).unwrap()
    }

    #[test]
    fn test_server_info() {
        let state = state_with(MockTransport::new());
        let info = server_info(&state);

        assert_eq!(info.server_info.name, "realtime-crypto");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_list_tools() {
        let state = state_with(MockTransport::new());
        let tools = list_tools(&state);

        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "get-exchange-details");
        assert_eq!(tools[0].input_schema["required"], json!(["exchange"]));
        assert_eq!(tools[1].name, "get-rates");
        assert_eq!(tools[1].input_schema["properties"]["currency"]["type"], "string");
    }

    #[tokio::test]
    async fn test_call_rates() {
        let state = state_with(MockTransport::new().then_json(
            200,
            json!({"data": {"id": "bitcoin", "symbol": "BTC", "currencySymbol": "$",
                            "type": "crypto", "rateUsd": "67123.456"}, "timestamp": 1}),
        ));

        let result = call_tool(
            &state,
            request(json!({"name": "get-rates", "arguments": {"currency": "BTC"}})),
        )
        .await
        .unwrap();

        let result = serde_json::to_value(result).unwrap();
        assert_ne!(result["isError"], true);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(
            result["content"][0]["text"],
            "Current rate for bitcoin:\n\nSymbol: BTC $\nType: crypto\nUSD Rate: $67,123.46"
        );
    }

    #[tokio::test]
    async fn test_missing_argument_reports_tool_error() {
        let state = state_with(MockTransport::new().always(MockReply::status(500)));

        let result = call_tool(&state, request(json!({"name": "get-exchange-details"})))
            .await
            .unwrap();

        let result = serde_json::to_value(result).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error: Tool validation error: Missing required parameter: exchange"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let state = state_with(MockTransport::new());

        let err = call_tool(&state, request(json!({"name": "get-prices", "arguments": {}})))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("get-prices"));
    }
}
