//! Mint state reader.
//!
//! Reading a mint is a two-stage pipeline: the owner program must be resolved
//! before the authority fields can be decoded, because the decoding depends
//! on which token program format the account uses. The stages are separate
//! types so the second cannot be started without the output of the first.

use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::sources::LedgerReader;
use crate::preflight::types::{DecodedMint, MintSnapshot};
use crate::types::ProgramKind;
use solana_sdk::pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Mint;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Stage one output: an existing account whose owner program is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMintAccount {
    pub address: Pubkey,
    pub owner_program: Pubkey,
}

impl ResolvedMintAccount {
    pub fn program_kind(&self) -> ProgramKind {
        ProgramKind::classify(&self.owner_program)
    }

    /// Stage two: decode authorities and supply for the resolved program.
    #[instrument(skip(self, ledger), fields(mint = %self.address, program = %self.program_kind()))]
    pub async fn decode(self, ledger: &dyn LedgerReader) -> PreflightResult<MintSnapshot> {
        let decoded = ledger
            .decoded_mint(&self.address, &self.owner_program)
            .await?;

        let snapshot = MintSnapshot {
            address: self.address,
            owner_program: self.owner_program,
            decimals: decoded.decimals,
            supply: decoded.supply,
            freeze_authority: decoded.freeze_authority,
            mint_authority: decoded.mint_authority,
            has_extended_features: self.program_kind().has_extensions(),
        };

        debug!(
            "Mint snapshot: supply={}, decimals={}, freeze={:?}, mint={:?}",
            snapshot.supply, snapshot.decimals, snapshot.freeze_authority, snapshot.mint_authority
        );
        Ok(snapshot)
    }
}

/// Produces a normalized `MintSnapshot` from ledger reads.
pub struct MintStateReader {
    ledger: Arc<dyn LedgerReader>,
}

impl MintStateReader {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    /// Stage one: confirm the account exists and learn its owner program.
    #[instrument(skip(self), fields(mint = %address))]
    pub async fn resolve_program(&self, address: &Pubkey) -> PreflightResult<ResolvedMintAccount> {
        let account = self.ledger.account_state(address).await?;

        debug!("Mint account owned by {}", account.owner);
        Ok(ResolvedMintAccount {
            address: *address,
            owner_program: account.owner,
        })
    }

    /// Run both stages.
    pub async fn read_snapshot(&self, address: &Pubkey) -> PreflightResult<MintSnapshot> {
        let resolved = self.resolve_program(address).await?;
        resolved.decode(self.ledger.as_ref()).await
    }
}

/// Decode the base mint layout shared by SPL Token and Token-2022.
///
/// Token-2022 mints append extension data after the first 82 bytes; only the
/// base fields are read here.
pub fn decode_base_mint(address: &Pubkey, data: &[u8]) -> PreflightResult<DecodedMint> {
    if data.len() < Mint::LEN {
        return Err(PreflightError::NotFound(format!(
            "{} is not a mint account ({} bytes of data)",
            address,
            data.len()
        )));
    }

    let mint = Mint::unpack(&data[..Mint::LEN]).map_err(|e| {
        PreflightError::NotFound(format!("{} is not an initialized mint: {}", address, e))
    })?;

    Ok(DecodedMint {
        decimals: mint.decimals,
        supply: mint.supply,
        freeze_authority: mint.freeze_authority.into(),
        mint_authority: mint.mint_authority.into(),
    })
}
