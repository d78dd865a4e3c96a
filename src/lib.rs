//! token-preflight - pre-trade risk assessment for Solana tokens
//!
//! Inspects a mint's authorities and holder distribution and simulates a
//! round-trip swap quote to produce an explainable go/no-go report.

pub mod types;
pub mod preflight;

// Re-export main types for convenience
pub use preflight::{Assessor, PreflightBuilder, PreflightConfig, PreflightError, PreflightReport, Verdict};
pub use types::ProgramKind;
