//! Risk flag aggregation.
//!
//! Pure and deterministic: the same snapshot, concentration and thresholds
//! always produce the same flags in the same order. Flags follow evaluation
//! order, not severity.

use crate::preflight::types::{HolderConcentration, MintSnapshot, RiskReport, RiskThresholds, Verdict};

pub const FREEZE_AUTHORITY_FLAG: &str = "freeze authority present (rug lever)";
pub const MINT_AUTHORITY_FLAG: &str = "mint authority present (can mint more)";
pub const EXTENDED_PROGRAM_FLAG: &str =
    "extended-program mint; possible transfer fee (dust test recommended)";

/// Evaluate the on-chain checks into ordered flags and a verdict.
pub fn evaluate(
    snapshot: &MintSnapshot,
    concentration: &HolderConcentration,
    thresholds: &RiskThresholds,
) -> RiskReport {
    let mut flags = Vec::new();

    if snapshot.freeze_authority.is_some() {
        flags.push(FREEZE_AUTHORITY_FLAG.to_string());
    }
    if snapshot.mint_authority.is_some() {
        flags.push(MINT_AUTHORITY_FLAG.to_string());
    }
    if snapshot.has_extended_features {
        flags.push(EXTENDED_PROGRAM_FLAG.to_string());
    }
    if concentration.ratio > thresholds.concentration {
        flags.push(format!(
            "high holder concentration ({})",
            format_pct(concentration.ratio)
        ));
    }

    let verdict = if flags.is_empty() { Verdict::Ok } else { Verdict::Risky };
    RiskReport { flags, verdict }
}

/// Render a 0..1 ratio as a percentage with two decimals.
pub fn format_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TOKEN_PROGRAM_ID;
    use solana_sdk::pubkey::Pubkey;

    fn clean_snapshot() -> MintSnapshot {
        MintSnapshot {
            address: Pubkey::new_unique(),
            owner_program: TOKEN_PROGRAM_ID,
            decimals: 9,
            supply: 1_000_000_000_000_000,
            freeze_authority: None,
            mint_authority: None,
            has_extended_features: false,
        }
    }

    fn concentration(ratio: f64) -> HolderConcentration {
        HolderConcentration {
            top10_sum: ratio * 1_000_000.0,
            total_supply_ui: 1_000_000.0,
            ratio,
            holders_considered: 10,
        }
    }

    #[test]
    fn test_clean_mint_is_ok() {
        for ratio in [0.0, 0.05, 0.20] {
            let report = evaluate(&clean_snapshot(), &concentration(ratio), &RiskThresholds::default());
            assert!(report.flags.is_empty());
            assert_eq!(report.verdict, Verdict::Ok);
        }
    }

    #[test]
    fn test_freeze_authority_flag_comes_first() {
        let mut snapshot = clean_snapshot();
        snapshot.freeze_authority = Some(Pubkey::new_unique());
        snapshot.mint_authority = Some(Pubkey::new_unique());
        snapshot.has_extended_features = true;

        let report = evaluate(&snapshot, &concentration(0.9), &RiskThresholds::default());
        assert_eq!(report.flags.len(), 4);
        assert_eq!(report.flags[0], FREEZE_AUTHORITY_FLAG);
        assert_eq!(report.flags[1], MINT_AUTHORITY_FLAG);
        assert_eq!(report.flags[2], EXTENDED_PROGRAM_FLAG);
        assert!(report.flags[3].starts_with("high holder concentration"));
        assert_eq!(report.verdict, Verdict::Risky);
    }

    #[test]
    fn test_concentration_flag_text() {
        let report = evaluate(&clean_snapshot(), &concentration(0.25), &RiskThresholds::default());
        assert_eq!(report.flags, vec!["high holder concentration (25.00%)".to_string()]);
        assert_eq!(report.verdict, Verdict::Risky);
    }

    #[test]
    fn test_concentration_threshold_is_tunable() {
        let thresholds = RiskThresholds {
            concentration: 0.5,
            ..RiskThresholds::default()
        };
        let report = evaluate(&clean_snapshot(), &concentration(0.25), &thresholds);
        assert_eq!(report.verdict, Verdict::Ok);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut snapshot = clean_snapshot();
        snapshot.mint_authority = Some(Pubkey::new_unique());
        let holders = concentration(0.333);
        let thresholds = RiskThresholds::default();

        let first = evaluate(&snapshot, &holders, &thresholds);
        let second = evaluate(&snapshot, &holders, &thresholds);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(0.25), "25.00%");
        assert_eq!(format_pct(0.0), "0.00%");
        assert_eq!(format_pct(1.0), "100.00%");
    }
}
