//! Exchange Details Tool
//!
//! Looks up a single exchange on CoinCap (`GET /exchanges/{id}`).

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{
    Tool, ToolSchema, ToolCall, ToolResult,
    tool::ParameterSchema,
    Result as CoreResult,
};

use crate::format::format_exchange_details;
use crate::model::ExchangeRecord;
use crate::upstream::CoinCapClient;

use super::{failure, id_arg, lookup};

pub const TOOL_NAME: &str = "get-exchange-details";
const PARAM: &str = "exchange";

/// Tool for looking up exchange details
pub struct ExchangeDetailsTool {
    client: Arc<CoinCapClient>,
}

impl ExchangeDetailsTool {
    pub const fn new(client: Arc<CoinCapClient>) -> Self {
        Self { client }
    }

    async fn details(&self, exchange_id: &str) -> ToolResult {
        let miss = format!("Failed to retrieve details for exchange: {exchange_id}");
        lookup(&self.client, "exchanges", exchange_id, miss, |data: &ExchangeRecord| {
            let name = data
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(exchange_id);
            format!(
                "Exchange details for {name}:\n\n{}",
                format_exchange_details(data)
            )
        })
        .await
    }
}

#[async_trait]
impl Tool for ExchangeDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Get details about a cryptocurrency exchange".into(),
            parameters: vec![ParameterSchema::required_string(
                PARAM,
                "Exchange ID (e.g., binance, coinbase, kraken)",
            )],
            category: Some("market_data".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let result = match id_arg(call, PARAM) {
            Ok(exchange_id) => self.details(&exchange_id).await,
            Err(e) => failure(TOOL_NAME, &e),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{FetchPolicy, MockReply, MockTransport};
    use serde_json::json;

    fn tool_with(transport: &Arc<MockTransport>) -> ExchangeDetailsTool {
        let client = CoinCapClient::new(transport.clone(), "https://api.test/v2", FetchPolicy::retrying())
            .unwrap();
        ExchangeDetailsTool::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_null_data_is_soft_miss() {
        let transport = Arc::new(
            MockTransport::new().then_json(200, json!({"data": null, "timestamp": 1})),
        );
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("exchange", "Kraken"))
            .await
            .unwrap();

        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Failed to retrieve details for exchange: kraken")
        );
        assert_eq!(
            transport.calls().await[0].url,
            "https://api.test/v2/exchanges/kraken"
        );
    }

    #[tokio::test]
    async fn test_success() {
        let transport = Arc::new(MockTransport::new().then_json(
            200,
            json!({
                "data": {
                    "exchangeId": "binance",
                    "name": "Binance",
                    "rank": "1",
                    "percentTotalVolume": "28.5",
                    "volumeUsd": "1234567.5",
                    "tradingPairs": "1500",
                    "socket": true,
                    "exchangeUrl": "https://www.binance.com/",
                    "updated": 1_700_000_000_000_i64
                },
                "timestamp": 1_700_000_000_500_i64
            }),
        ));
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("exchange", "BINANCE"))
            .await
            .unwrap();

        assert!(!result.is_error);
        let text = result.first_text().unwrap();
        assert!(text.starts_with("Exchange details for Binance:\n\nName: Binance\n"));
        assert!(text.contains("Volume (USD): $1,234,567.5"));
        assert!(text.contains("% of Total Volume: 28.50%"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_soft_miss() {
        let transport = Arc::new(MockTransport::new().always(MockReply::status(500)));
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("exchange", "kraken"))
            .await
            .unwrap();

        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Failed to retrieve details for exchange: kraken")
        );
    }

    #[tokio::test]
    async fn test_bad_argument_is_error_result() {
        let transport = Arc::new(MockTransport::new());
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("exchange", "   "))
            .await
            .unwrap();

        assert!(result.is_error);
        assert!(result.first_text().unwrap().starts_with("Error: "));
        assert_eq!(transport.call_count().await, 0);
    }
}
