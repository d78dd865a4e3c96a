//! Trade-side evidence: are people actually selling this token?
//!
//! Informational only. The counts land in the report next to the verdict but
//! never contribute flags.

use crate::preflight::error::PreflightError;
use crate::preflight::sources::TradeHistorySource;
use crate::preflight::types::{CheckOutcome, TradeEvidence, TradeRecord};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Side of a trade as classified from the free-form side string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
    Unclassified,
}

impl TradeSide {
    /// Case-insensitive substring match. A side naming both is ambiguous
    /// and counts toward neither.
    pub fn classify(side: Option<&str>) -> Self {
        let side = side.unwrap_or_default().to_lowercase();
        match (side.contains("buy"), side.contains("sell")) {
            (true, false) => TradeSide::Buy,
            (false, true) => TradeSide::Sell,
            _ => TradeSide::Unclassified,
        }
    }
}

pub struct TradeSideChecker {
    source: Option<Arc<dyn TradeHistorySource>>,
    limit: usize,
    sample_size: usize,
}

impl TradeSideChecker {
    /// `source` is `None` when no credentials are configured.
    pub fn new(source: Option<Arc<dyn TradeHistorySource>>, limit: usize, sample_size: usize) -> Self {
        Self {
            source,
            limit,
            sample_size,
        }
    }

    #[instrument(skip(self), fields(mint = %mint))]
    pub async fn check(&self, mint: &Pubkey) -> CheckOutcome<TradeEvidence> {
        let Some(source) = &self.source else {
            let skipped = PreflightError::CredentialMissing("no trade-history API key".to_string());
            debug!("Trade history not checked: {}", skipped);
            return CheckOutcome::Unavailable(skipped.to_string());
        };

        match source.recent_trades(mint, self.limit).await {
            Ok(records) => CheckOutcome::Checked(classify_trades(&records, self.sample_size)),
            Err(e) => {
                warn!("Trade history unavailable: {}", e);
                CheckOutcome::Unavailable(e.to_string())
            }
        }
    }
}

/// Count buys and sells and keep the first `sample_size` records.
pub fn classify_trades(records: &[TradeRecord], sample_size: usize) -> TradeEvidence {
    let mut sells = 0;
    let mut buys = 0;

    for record in records {
        match TradeSide::classify(record.side_label()) {
            TradeSide::Sell => sells += 1,
            TradeSide::Buy => buys += 1,
            TradeSide::Unclassified => {}
        }
    }

    debug!("Classified {} trades: {} buys, {} sells", records.len(), buys, sells);
    TradeEvidence {
        sells,
        buys,
        sample: records.iter().take(sample_size).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::error::PreflightResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(side: Option<&str>) -> TradeRecord {
        TradeRecord {
            side: side.map(str::to_string),
            kind: None,
            amount: Some(serde_json::json!(1.5)),
        }
    }

    struct FixedHistory {
        result: PreflightResult<Vec<TradeRecord>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TradeHistorySource for FixedHistory {
        async fn recent_trades(&self, _mint: &Pubkey, _limit: usize) -> PreflightResult<Vec<TradeRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[test]
    fn test_side_classification() {
        assert_eq!(TradeSide::classify(Some("SELL")), TradeSide::Sell);
        assert_eq!(TradeSide::classify(Some("swap_buy")), TradeSide::Buy);
        assert_eq!(TradeSide::classify(Some("transfer")), TradeSide::Unclassified);
        assert_eq!(TradeSide::classify(None), TradeSide::Unclassified);
        assert_eq!(TradeSide::classify(Some("Buy/Sell")), TradeSide::Unclassified);
    }

    #[test]
    fn test_classify_trades_counts_and_sample() {
        let records = vec![
            record(Some("buy")),
            record(Some("Sell")),
            record(Some("sell")),
            record(None),
            record(Some("add_liquidity")),
            record(Some("BUY")),
        ];

        let evidence = classify_trades(&records, 5);
        assert_eq!(evidence.sells, 2);
        assert_eq!(evidence.buys, 2);
        assert_eq!(evidence.sample.len(), 5);
        assert_eq!(evidence.sample[0], records[0]);
    }

    #[test]
    fn test_ambiguous_sides_count_toward_neither() {
        let records = vec![record(Some("buy_sell")), record(Some("sell")), record(Some("SELLBUY"))];

        let evidence = classify_trades(&records, 5);
        assert_eq!((evidence.sells, evidence.buys), (1, 0));
        assert_eq!(evidence.sample.len(), 3);
    }

    #[test]
    fn test_type_fallback_counts_but_sample_stays_raw() {
        let records = vec![TradeRecord {
            side: None,
            kind: Some("SELL".to_string()),
            amount: None,
        }];

        let evidence = classify_trades(&records, 5);
        assert_eq!((evidence.sells, evidence.buys), (1, 0));
        assert_eq!(evidence.sample[0].side, None);
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_without_io() {
        let checker = TradeSideChecker::new(None, 50, 5);
        let outcome = checker.check(&Pubkey::new_unique()).await;

        match outcome {
            CheckOutcome::Unavailable(reason) => assert!(reason.contains("credential missing")),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_error_degrades_gracefully() {
        let source = Arc::new(FixedHistory {
            result: Err(PreflightError::RpcUnavailable("401 Unauthorized".into())),
            calls: AtomicUsize::new(0),
        });
        let checker = TradeSideChecker::new(Some(source.clone()), 50, 5);

        let outcome = checker.check(&Pubkey::new_unique()).await;
        assert!(!outcome.is_checked());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_checked_evidence() {
        let source = Arc::new(FixedHistory {
            result: Ok(vec![record(Some("sell")), record(Some("buy"))]),
            calls: AtomicUsize::new(0),
        });
        let checker = TradeSideChecker::new(Some(source), 50, 5);

        let outcome = checker.check(&Pubkey::new_unique()).await;
        let evidence = outcome.checked().unwrap();
        assert_eq!((evidence.sells, evidence.buys), (1, 1));
    }
}
