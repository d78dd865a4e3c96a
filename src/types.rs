//! Core types shared across the token-preflight crate.

use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// The classic SPL Token program (Tokenkeg...).
pub const TOKEN_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// The SPL Token-2022 program with mint extensions (Tokenz...).
pub const TOKEN_2022_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// Wrapped SOL, the default base asset for round-trip probes.
pub const WRAPPED_SOL_MINT: Pubkey = solana_sdk::pubkey!("So11111111111111111111111111111111111111112");

/// Classification of the program that owns a mint account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    /// Standard SPL Token program
    SplToken,
    /// Token-2022, which may carry transfer-fee and other extensions
    Token2022,
    /// Anything else
    Custom(Pubkey),
}

impl ProgramKind {
    /// Classify an owner program id.
    pub fn classify(owner: &Pubkey) -> Self {
        if *owner == TOKEN_PROGRAM_ID {
            ProgramKind::SplToken
        } else if *owner == TOKEN_2022_PROGRAM_ID {
            ProgramKind::Token2022
        } else {
            ProgramKind::Custom(*owner)
        }
    }

    /// Whether mints owned by this program may carry extensions.
    pub fn has_extensions(&self) -> bool {
        matches!(self, ProgramKind::Token2022)
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramKind::SplToken => write!(f, "SPL Token (Tokenkeg)"),
            ProgramKind::Token2022 => write!(f, "SPL Token-2022 (Tokenz)"),
            ProgramKind::Custom(id) => write!(f, "Custom program: {}", id),
        }
    }
}
