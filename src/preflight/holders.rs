//! Holder concentration analysis.

use crate::preflight::error::PreflightResult;
use crate::preflight::sources::LedgerReader;
use crate::preflight::types::{HolderBalance, HolderConcentration, MintSnapshot};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Computes the share of supply held by the largest accounts.
pub struct HolderConcentrationAnalyzer {
    ledger: Arc<dyn LedgerReader>,
    top_n: usize,
}

impl HolderConcentrationAnalyzer {
    pub fn new(ledger: Arc<dyn LedgerReader>, top_n: usize) -> Self {
        Self { ledger, top_n }
    }

    /// Fetch the largest holders and compute concentration against the shared snapshot.
    #[instrument(skip(self, snapshot), fields(mint = %snapshot.address))]
    pub async fn analyze(&self, snapshot: &MintSnapshot) -> PreflightResult<HolderConcentration> {
        let largest = self.ledger.largest_holder_accounts(&snapshot.address).await?;
        debug!("Fetched {} largest holder accounts", largest.len());

        Ok(compute_concentration(&largest, snapshot.supply_ui(), self.top_n))
    }
}

/// Sum the first `top_n` balances (already sorted descending) against total supply.
pub fn compute_concentration(
    largest: &[HolderBalance],
    total_supply_ui: f64,
    top_n: usize,
) -> HolderConcentration {
    let considered = &largest[..largest.len().min(top_n)];
    let top10_sum: f64 = considered
        .iter()
        .map(|holder| holder.ui_amount.unwrap_or(0.0))
        .sum();

    let ratio = if total_supply_ui > 0.0 {
        (top10_sum / total_supply_ui).clamp(0.0, 1.0)
    } else {
        0.0
    };

    HolderConcentration {
        top10_sum,
        total_supply_ui,
        ratio,
        holders_considered: considered.len(),
    }
}
