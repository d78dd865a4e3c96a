//! Round-trip liquidity probe.
//!
//! Simulates a tiny buy followed by a sell of exactly what the buy returned.
//! The sell leg takes the typed output of the buy leg, so the two requests
//! can never be issued out of order or with a re-derived amount.

use crate::preflight::error::{PreflightError, PreflightResult};
use crate::preflight::sources::QuoteSource;
use crate::preflight::types::{CheckOutcome, ProbeReport, QuoteRoundTrip, RoundTripOutcome};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Output of the buy leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardQuote {
    pub probe_notional: u64,
    pub out_amount: u64,
}

/// Quote-only round trip between a base asset and the target.
pub struct RoundTripProber {
    quotes: Arc<dyn QuoteSource>,
    base_mint: Pubkey,
    probe_notional: u64,
    loss_threshold_pct: f64,
}

impl RoundTripProber {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        base_mint: Pubkey,
        probe_notional: u64,
        loss_threshold_pct: f64,
    ) -> Self {
        Self {
            quotes,
            base_mint,
            probe_notional,
            loss_threshold_pct,
        }
    }

    /// Stage one: base -> target for the probe notional. `None` means no buy route.
    #[instrument(skip(self), fields(base = %self.base_mint, amount = self.probe_notional))]
    pub async fn buy_leg(&self, target: &Pubkey) -> PreflightResult<Option<ForwardQuote>> {
        match self
            .quotes
            .best_route(&self.base_mint, target, self.probe_notional)
            .await
        {
            Ok(route) => {
                debug!("Buy leg returns {} target units", route.out_amount);
                Ok(Some(ForwardQuote {
                    probe_notional: self.probe_notional,
                    out_amount: route.out_amount,
                }))
            }
            Err(PreflightError::NoRoute(reason)) => {
                debug!("No buy route: {}", reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Stage two: target -> base for exactly the forward output.
    #[instrument(skip(self), fields(amount = forward.out_amount))]
    pub async fn sell_leg(
        &self,
        target: &Pubkey,
        forward: &ForwardQuote,
    ) -> PreflightResult<RoundTripOutcome> {
        match self
            .quotes
            .best_route(target, &self.base_mint, forward.out_amount)
            .await
        {
            Ok(route) => Ok(RoundTripOutcome::Completed(QuoteRoundTrip::new(
                forward.probe_notional,
                forward.out_amount,
                route.out_amount,
            ))),
            Err(PreflightError::NoRoute(reason)) => {
                debug!("No sell route: {}", reason);
                Ok(RoundTripOutcome::NoSellRoute {
                    forward_out_amount: forward.out_amount,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn run_legs(&self, target: &Pubkey) -> PreflightResult<RoundTripOutcome> {
        match self.buy_leg(target).await? {
            Some(forward) => self.sell_leg(target, &forward).await,
            None => Ok(RoundTripOutcome::NoBuyRoute),
        }
    }

    /// Run the probe, folding transport failures into "not checked".
    #[instrument(skip(self), fields(mint = %target))]
    pub async fn probe(&self, target: &Pubkey) -> ProbeReport {
        match self.run_legs(target).await {
            Ok(outcome) => {
                let note = outcome.note(self.loss_threshold_pct);
                if let RoundTripOutcome::Completed(trip) = &outcome {
                    info!("Round-trip loss {:.2}%", trip.round_trip_loss_pct);
                }
                ProbeReport {
                    result: CheckOutcome::Checked(outcome),
                    note,
                }
            }
            Err(e) => {
                warn!("Round-trip probe failed: {}", e);
                ProbeReport {
                    note: format!("Round-trip probe not checked ({})", e),
                    result: CheckOutcome::Unavailable(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::types::Route;
    use crate::types::WRAPPED_SOL_MINT;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers buy and sell legs from fixed results and records every request.
    struct ScriptedQuotes {
        buy: PreflightResult<u64>,
        sell: PreflightResult<u64>,
        requests: Mutex<Vec<(Pubkey, Pubkey, u64)>>,
    }

    impl ScriptedQuotes {
        fn new(buy: PreflightResult<u64>, sell: PreflightResult<u64>) -> Arc<Self> {
            Arc::new(Self {
                buy,
                sell,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedQuotes {
        async fn best_route(
            &self,
            input: &Pubkey,
            output: &Pubkey,
            amount: u64,
        ) -> PreflightResult<Route> {
            self.requests.lock().unwrap().push((*input, *output, amount));
            let leg = if *input == WRAPPED_SOL_MINT { &self.buy } else { &self.sell };
            leg.clone().map(|out_amount| Route { out_amount })
        }
    }

    fn prober(quotes: Arc<ScriptedQuotes>) -> RoundTripProber {
        RoundTripProber::new(quotes, WRAPPED_SOL_MINT, 5_000_000, 20.0)
    }

    #[tokio::test]
    async fn test_completed_round_trip() {
        let quotes = ScriptedQuotes::new(Ok(1_000_000), Ok(3_500_000));
        let report = prober(quotes.clone()).probe(&Pubkey::new_unique()).await;

        match report.result {
            CheckOutcome::Checked(RoundTripOutcome::Completed(trip)) => {
                assert_eq!(trip.forward_out_amount, 1_000_000);
                assert_eq!(trip.backward_out_amount, 3_500_000);
                assert_eq!(trip.round_trip_loss_pct, 30.0);
            }
            other => panic!("unexpected probe result: {:?}", other),
        }
        assert!(report.note.starts_with("Huge round-trip loss"));
    }

    #[tokio::test]
    async fn test_sell_leg_uses_literal_forward_output() {
        let target = Pubkey::new_unique();
        let quotes = ScriptedQuotes::new(Ok(1_234_567), Ok(4_900_000));
        prober(quotes.clone()).probe(&target).await;

        let requests = quotes.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], (WRAPPED_SOL_MINT, target, 5_000_000));
        assert_eq!(requests[1], (target, WRAPPED_SOL_MINT, 1_234_567));
    }

    #[tokio::test]
    async fn test_no_buy_route_skips_sell_leg() {
        let quotes = ScriptedQuotes::new(Err(PreflightError::NoRoute("none".into())), Ok(1));
        let report = prober(quotes.clone()).probe(&Pubkey::new_unique()).await;

        assert_eq!(report.result, CheckOutcome::Checked(RoundTripOutcome::NoBuyRoute));
        assert_eq!(report.note, "Could not fetch buy quote; token path missing.");
        assert_eq!(quotes.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_sell_route_is_distinct() {
        let quotes = ScriptedQuotes::new(Ok(777), Err(PreflightError::NoRoute("none".into())));
        let report = prober(quotes).probe(&Pubkey::new_unique()).await;

        assert_eq!(
            report.result,
            CheckOutcome::Checked(RoundTripOutcome::NoSellRoute { forward_out_amount: 777 })
        );
        assert_eq!(report.note, "Could not fetch sell quote; token illiquid or path missing.");
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_checked() {
        let quotes = ScriptedQuotes::new(Ok(10), Err(PreflightError::RpcUnavailable("502".into())));
        let report = prober(quotes).probe(&Pubkey::new_unique()).await;

        assert!(!report.result.is_checked());
        assert!(report.note.contains("not checked"));
    }

    #[tokio::test]
    async fn test_loss_at_threshold_is_reasonable() {
        let quotes = ScriptedQuotes::new(Ok(1_000_000), Ok(4_000_000));
        let report = prober(quotes).probe(&Pubkey::new_unique()).await;

        assert_eq!(report.note, "Round-trip quote looks reasonable for AMM spread.");
    }
}
