//! Service Kit - Agent Tools
//!
//! CoinCap lookups exposed as `agent_core::Tool` implementations.

mod exchange_details;
mod rates;

pub use exchange_details::ExchangeDetailsTool;
pub use rates::RatesTool;

use std::sync::Arc;

use agent_core::{AgentError, Result as CoreResult, ToolCall, ToolRegistry, ToolResult};
use serde::de::DeserializeOwned;

use crate::model::Envelope;
use crate::upstream::CoinCapClient;

/// Register every CoinCap tool against a shared client
pub fn register_all(registry: &mut ToolRegistry, client: &Arc<CoinCapClient>) {
    registry.register(ExchangeDetailsTool::new(client.clone()));
    registry.register(RatesTool::new(client.clone()));
}

/// Required identifier argument, trimmed and lower-cased
fn id_arg(call: &ToolCall, param: &str) -> CoreResult<String> {
    let id = call.str_arg(param)?.trim().to_lowercase();
    if id.is_empty() {
        return Err(AgentError::ToolValidation(format!(
            "Parameter '{param}' must not be empty"
        )));
    }
    Ok(id)
}

/// GET `{resource}/{id}` and render the record, or answer with `miss` when
/// the upstream fails or has no data for the id
async fn lookup<T, F>(
    client: &CoinCapClient,
    resource: &str,
    id: &str,
    miss: String,
    render: F,
) -> ToolResult
where
    T: DeserializeOwned + Send,
    F: FnOnce(&T) -> String + Send,
{
    let response = client
        .fetch_json_opt::<Envelope<T>>(&[resource, id])
        .await;

    match response.and_then(Envelope::into_data) {
        Some(data) => ToolResult::text(render(&data)),
        None => {
            tracing::info!(resource, id, "No data available");
            ToolResult::text(miss)
        }
    }
}

fn failure(tool: &str, err: &AgentError) -> ToolResult {
    tracing::error!(tool, "Error in {}.execute: {}", tool, err);
    ToolResult::error(format!("Error: {err}"))
}
