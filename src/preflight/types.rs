//! Core types and data structures for preflight assessments.

use crate::types::{ProgramKind, WRAPPED_SOL_MINT};
use serde::{Deserialize, Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;

/// Tunable heuristic thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Top-holder share of supply above which a flag is raised (0..1)
    pub concentration: f64,
    /// Round-trip loss percentage above which the probe note warns
    pub round_trip_loss_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            concentration: 0.20,
            round_trip_loss_pct: 20.0,
        }
    }
}

/// Explicit configuration passed into the assessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightConfig {
    /// Solana JSON-RPC endpoint
    pub rpc_endpoint: String,
    /// RPC timeout in seconds
    pub rpc_timeout_seconds: u64,
    /// Extra attempts for transient ledger failures (0 disables retries)
    pub rpc_retry_attempts: usize,
    /// Base URL of the swap quote aggregator
    pub quote_api_url: String,
    /// Base URL of the trade-history aggregator
    pub trade_history_api_url: String,
    /// Trade-history API key; the trade check is skipped without it
    pub trade_history_api_key: Option<String>,
    /// Base asset used for the round-trip probe
    pub base_mint: Pubkey,
    /// Probe notional in the base asset's smallest unit
    pub probe_notional: u64,
    /// Slippage tolerance sent with quote requests
    pub slippage_bps: u16,
    /// Heuristic thresholds
    pub thresholds: RiskThresholds,
    /// Number of largest holders summed for concentration
    pub top_holder_count: usize,
    /// Number of recent trades requested
    pub trade_history_limit: usize,
    /// Number of raw trades kept in the report sample
    pub trade_sample_size: usize,
    /// HTTP timeout in seconds for aggregator calls
    pub http_timeout_seconds: u64,
    /// Requests per second allowed against each HTTP aggregator
    pub rate_limit_requests_per_second: u32,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: "https://api.mainnet-beta.solana.com".to_string(),
            rpc_timeout_seconds: 30,
            rpc_retry_attempts: 0,
            quote_api_url: "https://quote-api.jup.ag/v6".to_string(),
            trade_history_api_url: "https://public-api.birdeye.so".to_string(),
            trade_history_api_key: None,
            base_mint: WRAPPED_SOL_MINT,
            // 0.005 SOL, roughly one dollar
            probe_notional: 5_000_000,
            slippage_bps: 50,
            thresholds: RiskThresholds::default(),
            top_holder_count: 10,
            trade_history_limit: 50,
            trade_sample_size: 5,
            http_timeout_seconds: 10,
            rate_limit_requests_per_second: 5,
        }
    }
}

// --- Collaborator payloads ---

/// Raw account as returned by the ledger.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Base mint fields decoded with knowledge of the owner program.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMint {
    pub decimals: u8,
    pub supply: u64,
    pub freeze_authority: Option<Pubkey>,
    pub mint_authority: Option<Pubkey>,
}

/// One entry of the largest-holder list.
#[derive(Debug, Clone, PartialEq)]
pub struct HolderBalance {
    pub ui_amount: Option<f64>,
}

/// Best route found by the quote aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub out_amount: u64,
}

/// A single trade record from the history source.
///
/// The report sample carries the raw `side` and `amount`; `kind` is only a
/// classification fallback and is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub side: Option<String>,
    #[serde(skip)]
    pub kind: Option<String>,
    pub amount: Option<serde_json::Value>,
}

impl TradeRecord {
    /// Side string used for classification: `side`, or `kind` when `side` is blank.
    pub fn side_label(&self) -> Option<&str> {
        self.side
            .as_deref()
            .filter(|side| !side.is_empty())
            .or(self.kind.as_deref())
    }
}

// --- Engine values ---

/// Point-in-time view of a mint account.
#[derive(Debug, Clone, PartialEq)]
pub struct MintSnapshot {
    pub address: Pubkey,
    pub owner_program: Pubkey,
    pub decimals: u8,
    pub supply: u64,
    pub freeze_authority: Option<Pubkey>,
    pub mint_authority: Option<Pubkey>,
    pub has_extended_features: bool,
}

impl MintSnapshot {
    pub fn program_kind(&self) -> ProgramKind {
        ProgramKind::classify(&self.owner_program)
    }

    /// Supply scaled by decimals.
    pub fn supply_ui(&self) -> f64 {
        self.supply as f64 / 10f64.powi(self.decimals as i32)
    }
}

/// Share of supply held by the largest accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolderConcentration {
    pub top10_sum: f64,
    pub total_supply_ui: f64,
    pub ratio: f64,
    pub holders_considered: usize,
}

/// Both legs of a successful round-trip probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRoundTrip {
    pub probe_notional: u64,
    pub forward_out_amount: u64,
    pub backward_out_amount: u64,
    #[serde(serialize_with = "serialize_two_decimals")]
    pub round_trip_loss_pct: f64,
}

impl QuoteRoundTrip {
    /// Build from the two leg outputs. A notional of zero yields zero loss.
    pub fn new(probe_notional: u64, forward_out_amount: u64, backward_out_amount: u64) -> Self {
        let round_trip_loss_pct = if probe_notional == 0 {
            0.0
        } else {
            let lost = probe_notional as i128 - backward_out_amount as i128;
            (lost as f64 * 100.0) / probe_notional as f64
        };

        Self {
            probe_notional,
            forward_out_amount,
            backward_out_amount,
            round_trip_loss_pct,
        }
    }

    pub fn exceeds(&self, threshold_pct: f64) -> bool {
        self.round_trip_loss_pct > threshold_pct
    }
}

/// What the round-trip probe found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoundTripOutcome {
    NoBuyRoute,
    NoSellRoute { forward_out_amount: u64 },
    Completed(QuoteRoundTrip),
}

impl RoundTripOutcome {
    /// Human-readable note for the report.
    pub fn note(&self, loss_threshold_pct: f64) -> String {
        match self {
            RoundTripOutcome::NoBuyRoute => {
                "Could not fetch buy quote; token path missing.".to_string()
            }
            RoundTripOutcome::NoSellRoute { .. } => {
                "Could not fetch sell quote; token illiquid or path missing.".to_string()
            }
            RoundTripOutcome::Completed(trip) if trip.exceeds(loss_threshold_pct) => {
                "Huge round-trip loss, likely tax/illiquidity. Dust test BEFORE sizing up.".to_string()
            }
            RoundTripOutcome::Completed(_) => {
                "Round-trip quote looks reasonable for AMM spread.".to_string()
            }
        }
    }
}

/// Buy/sell counts over recent trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEvidence {
    pub sells: usize,
    pub buys: usize,
    pub sample: Vec<TradeRecord>,
}

/// Result of an optional check: either performed, or skipped with a reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckOutcome<T> {
    Checked(T),
    Unavailable(String),
}

impl<T> CheckOutcome<T> {
    pub fn checked(&self) -> Option<&T> {
        match self {
            CheckOutcome::Checked(value) => Some(value),
            CheckOutcome::Unavailable(_) => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, CheckOutcome::Checked(_))
    }
}

/// Final go/no-go signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ok,
    Risky,
}

impl Verdict {
    pub fn summary(&self) -> &'static str {
        match self {
            Verdict::Ok => "Basic on-chain checks OK",
            Verdict::Risky => "Risky / proceed with caution",
        }
    }
}

/// Ordered flags and the verdict derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub flags: Vec<String>,
    pub verdict: Verdict,
}

/// Authority fields rendered as base58.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Authorities {
    pub freeze_authority: Option<String>,
    pub mint_authority: Option<String>,
}

/// Liquidity probe section of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub result: CheckOutcome<RoundTripOutcome>,
    pub note: String,
}

/// The single self-describing record produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreflightReport {
    pub mint: String,
    pub program: String,
    pub supply: f64,
    pub decimals: u8,
    pub authorities: Authorities,
    #[serde(serialize_with = "serialize_two_decimals")]
    pub top10_concentration_pct: f64,
    pub flags: Vec<String>,
    pub verdict: Verdict,
    pub verdict_summary: String,
    pub liquidity_probe: ProbeReport,
    pub trade_evidence: CheckOutcome<TradeEvidence>,
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

pub(crate) fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_two_decimals(*value))
}
