//! Command-line entry point: assess one mint and print the report as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use token_preflight::PreflightBuilder;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "token-preflight", about = "Pre-trade risk check for a Solana token mint")]
struct Cli {
    /// Mint address to assess
    mint: String,

    /// Solana JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = "https://api.mainnet-beta.solana.com")]
    rpc_url: String,

    /// Birdeye API key; the trade-history check is skipped without it
    #[arg(long, env = "BIRDEYE_API_KEY", hide_env_values = true)]
    birdeye_api_key: Option<String>,

    /// Top-10 holder share (0..1) above which the mint is flagged
    #[arg(long, default_value_t = 0.20)]
    concentration_threshold: f64,

    /// Round-trip loss percentage above which the probe warns
    #[arg(long, default_value_t = 20.0)]
    loss_threshold_pct: f64,

    /// Probe notional in lamports of wrapped SOL
    #[arg(long, default_value_t = 5_000_000)]
    probe_lamports: u64,

    /// Slippage tolerance for quote requests
    #[arg(long, default_value_t = 50)]
    slippage_bps: u16,

    /// Jupiter quote API base URL
    #[arg(long, default_value = "https://quote-api.jup.ag/v6")]
    quote_api_url: String,

    /// Birdeye API base URL
    #[arg(long, default_value = "https://public-api.birdeye.so")]
    trade_history_api_url: String,

    /// Requests per second allowed against each HTTP aggregator
    #[arg(long, default_value_t = 5)]
    rate_limit: u32,

    /// Extra attempts for transient RPC failures
    #[arg(long, default_value_t = 0)]
    retries: usize,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let assessor = PreflightBuilder::new()
        .with_rpc_endpoint(cli.rpc_url)
        .with_rpc_policy(30, cli.retries)
        .with_trade_history_api_key(cli.birdeye_api_key)
        .with_concentration_threshold(cli.concentration_threshold)
        .with_round_trip_loss_threshold(cli.loss_threshold_pct)
        .with_probe_notional(cli.probe_lamports)
        .with_slippage_bps(cli.slippage_bps)
        .with_api_urls(cli.quote_api_url, cli.trade_history_api_url)
        .with_rate_limit(cli.rate_limit)
        .build()
        .context("Failed to set up preflight assessor")?;

    info!("Starting preflight assessment for {}", cli.mint);

    let report = assessor
        .assess(&cli.mint)
        .await
        .with_context(|| format!("Preflight assessment failed for {}", cli.mint))?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
