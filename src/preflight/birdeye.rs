//! Birdeye trade-history implementation of `TradeHistorySource`.

use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::rate_limit::RequestThrottle;
use crate::preflight::sources::TradeHistorySource;
use crate::preflight::types::TradeRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct TradesResponse {
    data: Option<TradesData>,
}

/// `data` is a bare list on older endpoints and `{ "items": [...] }` on newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TradesData {
    List(Vec<RawTrade>),
    Paged { items: Vec<RawTrade> },
}

#[derive(Debug, Deserialize)]
struct RawTrade {
    side: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    amount: Option<serde_json::Value>,
}

impl From<RawTrade> for TradeRecord {
    fn from(raw: RawTrade) -> Self {
        TradeRecord {
            side: raw.side,
            kind: raw.kind,
            amount: raw.amount,
        }
    }
}

pub struct BirdeyeTrades {
    http_client: Client,
    base_url: String,
    api_key: String,
    throttle: RequestThrottle,
}

impl BirdeyeTrades {
    pub fn new(http_client: Client, base_url: &str, api_key: String, requests_per_second: u32) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            throttle: RequestThrottle::new(requests_per_second),
        }
    }
}

#[async_trait]
impl TradeHistorySource for BirdeyeTrades {
    #[instrument(skip(self), fields(mint = %mint))]
    async fn recent_trades(&self, mint: &Pubkey, limit: usize) -> PreflightResult<Vec<TradeRecord>> {
        self.throttle.acquire().await;

        let response = self
            .http_client
            .get(format!("{}/defi/txs/token", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("x-chain", "solana")
            .query(&[
                ("address", mint.to_string()),
                ("offset", "0".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| PreflightError::RpcUnavailable(format!("trade history request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PreflightError::RpcUnavailable(format!(
                "trade history API returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PreflightError::RpcUnavailable(format!("trade history body unreadable: {}", e)))?;

        let trades = parse_trades_response(&body)?;
        debug!("Fetched {} recent trades", trades.len());
        Ok(trades)
    }
}

/// Extract trade records from a trade-history response body.
pub fn parse_trades_response(body: &str) -> PreflightResult<Vec<TradeRecord>> {
    let response: TradesResponse = serde_json::from_str(body)
        .map_err(|e| PreflightError::RpcUnavailable(format!("malformed trade history: {}", e)))?;

    let raw = match response.data {
        Some(TradesData::List(items)) | Some(TradesData::Paged { items }) => items,
        None => {
            return Err(PreflightError::RpcUnavailable(
                "trade history response has no data".to_string(),
            ))
        }
    };

    Ok(raw.into_iter().map(TradeRecord::from).collect())
}
