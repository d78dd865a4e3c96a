//! Solana JSON-RPC implementation of `LedgerReader`.

use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::mint_reader::decode_base_mint;
use crate::preflight::sources::LedgerReader;
use crate::preflight::types::{AccountState, DecodedMint, HolderBalance};
use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, instrument};

/// Ledger reader backed by a nonblocking RPC client at `confirmed` commitment.
pub struct SolanaLedger {
    rpc: RpcClient,
    retry_attempts: usize,
}

impl SolanaLedger {
    pub fn new(endpoint: &str, timeout: Duration, retry_attempts: usize) -> Self {
        Self {
            rpc: RpcClient::new_with_timeout_and_commitment(
                endpoint.to_string(),
                timeout,
                CommitmentConfig::confirmed(),
            ),
            retry_attempts,
        }
    }

    /// Run `action`, retrying transient failures when retries are configured.
    async fn with_retries<T, F, Fut>(&self, action: F) -> PreflightResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PreflightResult<T>>,
    {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.retry_attempts);

        RetryIf::spawn(retry_strategy, action, PreflightError::is_transient).await
    }

    async fn fetch_account(&self, address: &Pubkey) -> PreflightResult<AccountState> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(unavailable)?;

        response
            .value
            .map(|account| AccountState {
                owner: account.owner,
                data: account.data,
            })
            .ok_or_else(|| PreflightError::NotFound(address.to_string()))
    }
}

fn unavailable(err: ClientError) -> PreflightError {
    PreflightError::RpcUnavailable(err.to_string())
}

#[async_trait]
impl LedgerReader for SolanaLedger {
    #[instrument(skip(self), fields(mint = %address))]
    async fn account_state(&self, address: &Pubkey) -> PreflightResult<AccountState> {
        self.with_retries(|| self.fetch_account(address)).await
    }

    #[instrument(skip(self), fields(mint = %address, program = %owner_program))]
    async fn decoded_mint(
        &self,
        address: &Pubkey,
        owner_program: &Pubkey,
    ) -> PreflightResult<DecodedMint> {
        let account = self.with_retries(|| self.fetch_account(address)).await?;

        if account.owner != *owner_program {
            return Err(PreflightError::NotFound(format!(
                "{} changed owner from {} to {}",
                address, owner_program, account.owner
            )));
        }

        decode_base_mint(address, &account.data)
    }

    #[instrument(skip(self), fields(mint = %mint))]
    async fn largest_holder_accounts(&self, mint: &Pubkey) -> PreflightResult<Vec<HolderBalance>> {
        let largest = self
            .with_retries(|| async {
                self.rpc
                    .get_token_largest_accounts(mint)
                    .await
                    .map_err(unavailable)
            })
            .await?;

        debug!("RPC returned {} largest accounts", largest.len());
        Ok(largest
            .into_iter()
            .map(|account| HolderBalance {
                ui_amount: account.amount.ui_amount,
            })
            .collect())
    }
}
