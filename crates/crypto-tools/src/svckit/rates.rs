//! Rate Lookup Tool
//!
//! Fetches the USD rate of a crypto or fiat currency (`GET /rates/{id}`).

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{
    Tool, ToolSchema, ToolCall, ToolResult,
    tool::ParameterSchema,
    Result as CoreResult,
};

use crate::format::format_rate_details;
use crate::model::RateRecord;
use crate::upstream::CoinCapClient;

use super::{failure, id_arg, lookup};

pub const TOOL_NAME: &str = "get-rates";
const PARAM: &str = "currency";

/// Tool for looking up USD rates
pub struct RatesTool {
    client: Arc<CoinCapClient>,
}

impl RatesTool {
    pub const fn new(client: Arc<CoinCapClient>) -> Self {
        Self { client }
    }

    async fn rate(&self, currency_id: &str) -> ToolResult {
        let miss = format!("Failed to retrieve rates for currency: {currency_id}");
        lookup(&self.client, "rates", currency_id, miss, |data: &RateRecord| {
            let id = data
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(currency_id);
            format!("Current rate for {id}:\n\n{}", format_rate_details(data))
        })
        .await
    }
}

#[async_trait]
impl Tool for RatesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Get exchange rates for a cryptocurrency".into(),
            parameters: vec![ParameterSchema::required_string(
                PARAM,
                "Cryptocurrency ID (e.g., bitcoin, ethereum, litecoin)",
            )],
            category: Some("market_data".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let result = match id_arg(call, PARAM) {
            Ok(currency_id) => self.rate(&currency_id).await,
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
    use std::time::Duration;
    use tokio::time::Instant;

    fn tool_with(transport: &Arc<MockTransport>) -> RatesTool {
        let client = CoinCapClient::new(transport.clone(), "https://api.test/v2", FetchPolicy::retrying())
            .unwrap();
        RatesTool::new(Arc::new(client))
    }

    fn bitcoin() -> serde_json::Value {
        json!({
            "data": {
                "id": "bitcoin",
                "symbol": "BTC",
                "currencySymbol": "$",
                "type": "crypto",
                "rateUsd": "67123.456"
            },
            "timestamp": 1_700_000_000_000_i64
        })
    }

    #[tokio::test]
    async fn test_success() {
        let transport = Arc::new(MockTransport::new().then_json(200, bitcoin()));
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("currency", "Bitcoin"))
            .await
            .unwrap();

        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Current rate for bitcoin:\n\nSymbol: BTC $\nType: crypto\nUSD Rate: $67,123.46")
        );
        assert_eq!(transport.calls().await[0].url, "https://api.test/v2/rates/bitcoin");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rides_out_rate_limiting() {
        let transport = Arc::new(
            MockTransport::new()
                .then_status(429)
                .then_status(429)
                .then_json(200, bitcoin()),
        );
        let tool = tool_with(&transport);
        let started = Instant::now();

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("currency", "bitcoin"))
            .await
            .unwrap();

        assert!(result.first_text().unwrap().starts_with("Current rate for bitcoin:"));
        assert_eq!(transport.call_count().await, 3);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_rate_limit_is_soft_miss() {
        let transport = Arc::new(MockTransport::new().always(MockReply::status(429)));
        let tool = tool_with(&transport);

        let result = tool
            .execute(&ToolCall::new(TOOL_NAME).with_arg("currency", "ETHEREUM"))
            .await
            .unwrap();

        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Failed to retrieve rates for currency: ethereum")
        );
        assert_eq!(transport.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_missing_argument_is_error_result() {
        let transport = Arc::new(MockTransport::new());
        let tool = tool_with(&transport);

        let result = tool.execute(&ToolCall::new(TOOL_NAME)).await.unwrap();

        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Error: Tool validation error: Missing required parameter: currency")
        );
    }
}
