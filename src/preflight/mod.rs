//! Preflight module - the risk assessment engine.
//!
//! Reads mint state, holder concentration, a round-trip quote probe and recent
//! trade sides for a token, and reduces the on-chain signals to ordered risk
//! flags and an OK/RISKY verdict.

pub mod types;
pub mod error;
pub mod sources;
pub mod mint_reader;
pub mod holders;
pub mod liquidity;
pub mod trades;
pub mod verdict;
pub mod rate_limit;
pub mod rpc;
pub mod jupiter;
pub mod birdeye;
pub mod assessor;

// Re-export main public types and the assessor
pub use assessor::{parse_mint, Assessor};
pub use error::{PreflightError, PreflightResult};
pub use sources::{LedgerReader, QuoteSource, TradeHistorySource};
pub use types::{
    CheckOutcome, HolderConcentration, MintSnapshot, PreflightConfig, PreflightReport,
    QuoteRoundTrip, RiskReport, RiskThresholds, RoundTripOutcome, TradeEvidence, Verdict,
};

/// Builder for `PreflightConfig` with sensible defaults.
pub struct PreflightBuilder {
    config: PreflightConfig,
}

impl PreflightBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: PreflightConfig::default(),
        }
    }

    /// Set the RPC endpoint.
    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.rpc_endpoint = endpoint.into();
        self
    }

    /// Set RPC timeout and retry attempts for transient failures.
    pub fn with_rpc_policy(mut self, timeout_seconds: u64, retry_attempts: usize) -> Self {
        self.config.rpc_timeout_seconds = timeout_seconds;
        self.config.rpc_retry_attempts = retry_attempts;
        self
    }

    /// Set the trade-history API key. `None` disables the trade check.
    pub fn with_trade_history_api_key(mut self, api_key: Option<String>) -> Self {
        self.config.trade_history_api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_concentration_threshold(mut self, threshold: f64) -> Self {
        self.config.thresholds.concentration = threshold;
        self
    }

    pub fn with_round_trip_loss_threshold(mut self, threshold_pct: f64) -> Self {
        self.config.thresholds.round_trip_loss_pct = threshold_pct;
        self
    }

    /// Set the probe notional in the base asset's smallest unit.
    pub fn with_probe_notional(mut self, amount: u64) -> Self {
        self.config.probe_notional = amount;
        self
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.config.slippage_bps = slippage_bps;
        self
    }

    /// Set aggregator base URLs.
    pub fn with_api_urls(mut self, quote_api_url: impl Into<String>, trade_history_api_url: impl Into<String>) -> Self {
        self.config.quote_api_url = quote_api_url.into();
        self.config.trade_history_api_url = trade_history_api_url.into();
        self
    }

    /// Set per-aggregator rate limiting.
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.config.rate_limit_requests_per_second = requests_per_second;
        self
    }

    /// Build the configuration.
    pub fn build_config(self) -> PreflightConfig {
        self.config
    }

    /// Build an assessor backed by the production collaborators.
    pub fn build(self) -> PreflightResult<Assessor> {
        Assessor::from_config(self.config)
    }
}

impl Default for PreflightBuilder {
    fn default() -> Self {
        Self::new()
    }
}
