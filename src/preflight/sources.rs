//! Collaborator seams consumed by the assessment engine.
//!
//! Each external service sits behind one of these traits so the engine can be
//! driven by the concrete Solana/Jupiter/Birdeye clients in production and by
//! in-memory fakes in tests.

use crate::preflight::error::PreflightResult;
use crate::preflight::types::{AccountState, DecodedMint, HolderBalance, Route, TradeRecord};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

/// Read access to mint and token-account state on the ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Fetch the raw account. `NotFound` when it does not exist.
    async fn account_state(&self, address: &Pubkey) -> PreflightResult<AccountState>;

    /// Decode the base mint fields, given the program that owns the account.
    async fn decoded_mint(
        &self,
        address: &Pubkey,
        owner_program: &Pubkey,
    ) -> PreflightResult<DecodedMint>;

    /// Largest token accounts for the mint, sorted descending by balance.
    async fn largest_holder_accounts(&self, mint: &Pubkey) -> PreflightResult<Vec<HolderBalance>>;
}

/// Swap quote aggregator.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Best route for `amount` smallest units of `input`. `NoRoute` when there is no path.
    async fn best_route(
        &self,
        input: &Pubkey,
        output: &Pubkey,
        amount: u64,
    ) -> PreflightResult<Route>;
}

/// Recent trade history for an asset.
#[async_trait]
pub trait TradeHistorySource: Send + Sync {
    async fn recent_trades(&self, mint: &Pubkey, limit: usize) -> PreflightResult<Vec<TradeRecord>>;
}
