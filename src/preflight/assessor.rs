//! Assessment orchestration.
//!
//! Resolves the mint once, fans out the independent checks concurrently, and
//! hands the results to the verdict engine.

use crate::preflight::birdeye::BirdeyeTrades;
use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::holders::HolderConcentrationAnalyzer;
use crate::preflight::jupiter::JupiterQuotes;
use crate::preflight::liquidity::RoundTripProber;
use crate::preflight::mint_reader::MintStateReader;
use crate::preflight::rpc::SolanaLedger;
use crate::preflight::sources::{LedgerReader, QuoteSource, TradeHistorySource};
use crate::preflight::trades::TradeSideChecker;
use crate::preflight::types::{Authorities, PreflightConfig, PreflightReport};
use crate::preflight::verdict;
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Parse a mint identifier. Fails before any I/O.
pub fn parse_mint(input: &str) -> PreflightResult<Pubkey> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PreflightError::InvalidInput("mint address is empty".to_string()));
    }

    Pubkey::from_str(trimmed)
        .map_err(|e| PreflightError::InvalidInput(format!("{:?} is not a valid address: {}", trimmed, e)))
}

/// Runs single-shot preflight assessments.
pub struct Assessor {
    config: PreflightConfig,
    mint_reader: MintStateReader,
    holders: HolderConcentrationAnalyzer,
    prober: RoundTripProber,
    trades: TradeSideChecker,
}

impl Assessor {
    /// Assemble an assessor from explicit collaborators.
    pub fn new(
        config: PreflightConfig,
        ledger: Arc<dyn LedgerReader>,
        quotes: Arc<dyn QuoteSource>,
        trade_history: Option<Arc<dyn TradeHistorySource>>,
    ) -> Self {
        let mint_reader = MintStateReader::new(ledger.clone());
        let holders = HolderConcentrationAnalyzer::new(ledger, config.top_holder_count);
        let prober = RoundTripProber::new(
            quotes,
            config.base_mint,
            config.probe_notional,
            config.thresholds.round_trip_loss_pct,
        );
        let trades = TradeSideChecker::new(
            trade_history,
            config.trade_history_limit,
            config.trade_sample_size,
        );

        Self {
            config,
            mint_reader,
            holders,
            prober,
            trades,
        }
    }

    /// Assemble an assessor backed by Solana RPC, Jupiter and (with a key) Birdeye.
    pub fn from_config(config: PreflightConfig) -> PreflightResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| PreflightError::RpcUnavailable(format!("failed to build HTTP client: {}", e)))?;

        let ledger: Arc<dyn LedgerReader> = Arc::new(SolanaLedger::new(
            &config.rpc_endpoint,
            Duration::from_secs(config.rpc_timeout_seconds),
            config.rpc_retry_attempts,
        ));

        let quotes: Arc<dyn QuoteSource> = Arc::new(JupiterQuotes::new(
            http_client.clone(),
            &config.quote_api_url,
            config.slippage_bps,
            config.rate_limit_requests_per_second,
        ));

        let trade_history = config.trade_history_api_key.clone().map(|api_key| {
            Arc::new(BirdeyeTrades::new(
                http_client,
                &config.trade_history_api_url,
                api_key,
                config.rate_limit_requests_per_second,
            )) as Arc<dyn TradeHistorySource>
        });

        info!(
            "Created preflight assessor (rpc={}, trade history {})",
            config.rpc_endpoint,
            if trade_history.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self::new(config, ledger, quotes, trade_history))
    }

    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    /// Assess one mint. Only input, lookup and ledger transport errors are fatal.
    #[instrument(skip(self))]
    pub async fn assess(&self, mint: &str) -> PreflightResult<PreflightReport> {
        let start_time = Instant::now();
        let address = parse_mint(mint)?;

        let snapshot = self.mint_reader.read_snapshot(&address).await?;

        let (concentration, probe, trade_evidence) = tokio::join!(
            self.holders.analyze(&snapshot),
            self.prober.probe(&address),
            self.trades.check(&address),
        );
        // Assess only ever fails with a fatal error
        let concentration = concentration.map_err(|e| {
            if e.is_fatal() {
                e
            } else {
                PreflightError::RpcUnavailable(format!("holder lookup failed: {}", e))
            }
        })?;

        let risk = verdict::evaluate(&snapshot, &concentration, &self.config.thresholds);

        info!(
            "Assessed {} as {:?} with {} flag(s) in {}ms",
            address,
            risk.verdict,
            risk.flags.len(),
            start_time.elapsed().as_millis()
        );

        Ok(PreflightReport {
            mint: address.to_string(),
            program: snapshot.program_kind().to_string(),
            supply: snapshot.supply_ui(),
            decimals: snapshot.decimals,
            authorities: Authorities {
                freeze_authority: snapshot.freeze_authority.map(|key| key.to_string()),
                mint_authority: snapshot.mint_authority.map(|key| key.to_string()),
            },
            top10_concentration_pct: concentration.ratio * 100.0,
            verdict_summary: risk.verdict.summary().to_string(),
            flags: risk.flags,
            verdict: risk.verdict,
            liquidity_probe: probe,
            trade_evidence,
            assessed_at: chrono::Utc::now(),
        })
    }
}
