//! Jupiter v6 quote API implementation of `QuoteSource`.

use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::rate_limit::RequestThrottle;
use crate::preflight::sources::QuoteSource;
use crate::preflight::types::Route;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    out_amount: Option<String>,
    error: Option<String>,
}

pub struct JupiterQuotes {
    http_client: Client,
    base_url: String,
    slippage_bps: u16,
    throttle: RequestThrottle,
}

impl JupiterQuotes {
    pub fn new(http_client: Client, base_url: &str, slippage_bps: u16, requests_per_second: u32) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            slippage_bps,
            throttle: RequestThrottle::new(requests_per_second),
        }
    }
}

#[async_trait]
impl QuoteSource for JupiterQuotes {
    #[instrument(skip(self), fields(input = %input, output = %output))]
    async fn best_route(
        &self,
        input: &Pubkey,
        output: &Pubkey,
        amount: u64,
    ) -> PreflightResult<Route> {
        self.throttle.acquire().await;

        let response = self
            .http_client
            .get(format!("{}/quote", self.base_url))
            .query(&[
                ("inputMint", input.to_string()),
                ("outputMint", output.to_string()),
                ("amount", amount.to_string()),
                ("slippageBps", self.slippage_bps.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PreflightError::RpcUnavailable(format!("quote request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PreflightError::RpcUnavailable(format!("quote body unreadable: {}", e)))?;

        let route = parse_quote_response(status, &body)?;
        debug!("Quote {} -> {}: {} in, {} out", input, output, amount, route.out_amount);
        Ok(route)
    }
}

/// Map a quote API response to a route.
///
/// Server errors are transport failures; any other unsuccessful or malformed
/// answer means the aggregator has no usable path.
pub fn parse_quote_response(status: StatusCode, body: &str) -> PreflightResult<Route> {
    if status.is_server_error() {
        return Err(PreflightError::RpcUnavailable(format!("quote API returned {}", status)));
    }

    let parsed: Option<QuoteResponse> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let reason = parsed
            .and_then(|quote| quote.error)
            .unwrap_or_else(|| format!("quote API returned {}", status));
        return Err(PreflightError::NoRoute(reason));
    }

    let quote = parsed.ok_or_else(|| PreflightError::NoRoute("unparseable quote response".to_string()))?;
    if let Some(error) = quote.error {
        return Err(PreflightError::NoRoute(error));
    }

    let out_amount = quote
        .out_amount
        .and_then(|amount| amount.parse::<u64>().ok())
        .ok_or_else(|| PreflightError::NoRoute("quote has no outAmount".to_string()))?;

    Ok(Route { out_amount })
}
