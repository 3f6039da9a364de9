use anchor_lang::prelude::*;

use crate::errors::AnalysisPoolError;
use crate::ledger::*;
use crate::operations::normalize::normalize_position;

/// Merge the registry aggregate with the per-staker ledger into one set of
/// pool totals.
///
/// Priority:
///   1. Secondary ledger reports activity: its backer breakdown plus the
///      creator stake.
///   2. Registry total exceeds the creator stake: the excess is counted as
///      `disagree` (no breakdown exists to say otherwise).
///   3. Otherwise the creator stake is the whole pool.
///
/// A missing secondary read never aborts; it marks the result provisional.
/// A missing primary read is an error because the creator stake is unknown.
pub fn handler(
    primary: &LedgerRead<PrimaryLedgerRecord>,
    secondary: &LedgerRead<SecondaryLedgerReport>,
) -> Result<ReconciledTotals> {
    let LedgerRead::Available(primary) = primary else {
        return err!(AnalysisPoolError::PrimaryLedgerUnavailable);
    };

    let creator_stake = primary.creator_stake;
    let creator_position = normalize_position(primary.declared_raw_position);
    let secondary_confidence = if secondary.is_available() {
        Confidence::Confirmed
    } else {
        Confidence::Provisional
    };

    let totals = match secondary {
        LedgerRead::Available(report) if report.grand_total > 0 => {
            let backer_total = report
                .agree_total
                .checked_add(report.disagree_total)
                .ok_or(AnalysisPoolError::Overflow)?;

            // Grand total is rebuilt from the breakdown so it always balances;
            // a report whose own total disagrees is only trusted provisionally.
            let confidence = if backer_total == report.grand_total {
                Confidence::Confirmed
            } else {
                msg!(
                    "Secondary ledger totals disagree: agree={} + disagree={} != grand={}",
                    report.agree_total,
                    report.disagree_total,
                    report.grand_total,
                );
                Confidence::Provisional
            };

            ReconciledTotals {
                creator_stake,
                creator_position,
                agree_total: creator_stake
                    .checked_add(report.agree_total)
                    .ok_or(AnalysisPoolError::Overflow)?,
                disagree_total: report.disagree_total,
                grand_total: creator_stake
                    .checked_add(backer_total)
                    .ok_or(AnalysisPoolError::Overflow)?,
                source: TotalsSource::SecondaryLedger,
                confidence,
            }
        }
        _ if primary.grand_total > creator_stake => ReconciledTotals {
            creator_stake,
            creator_position,
            agree_total: creator_stake,
            disagree_total: primary.grand_total - creator_stake,
            grand_total: primary.grand_total,
            source: TotalsSource::PrimaryExcess,
            confidence: Confidence::Provisional,
        },
        _ => ReconciledTotals {
            creator_stake,
            creator_position,
            agree_total: creator_stake,
            disagree_total: 0,
            grand_total: creator_stake,
            source: TotalsSource::CreatorOnly,
            confidence: secondary_confidence,
        },
    };

    msg!(
        "Reconciled: source={:?} confidence={:?} agree={} disagree={} grand={}",
        totals.source,
        totals.confidence,
        totals.agree_total,
        totals.disagree_total,
        totals.grand_total,
    );

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    const USDC: u64 = 1_000_000;

    fn primary(creator_stake: u64, grand_total: u64) -> LedgerRead<PrimaryLedgerRecord> {
        LedgerRead::Available(PrimaryLedgerRecord {
            creator: Pubkey::new_unique(),
            creator_stake,
            declared_raw_position: false,
            grand_total,
            resolved: false,
            raw_outcome: false,
        })
    }

    fn report(agree: u64, disagree: u64) -> LedgerRead<SecondaryLedgerReport> {
        LedgerRead::Available(SecondaryLedgerReport {
            agree_total: agree,
            disagree_total: disagree,
            grand_total: agree + disagree,
            staker_count: 2,
        })
    }

    #[test]
    fn secondary_breakdown_is_authoritative() {
        let totals = handler(&primary(20 * USDC, 100 * USDC), &report(50 * USDC, 30 * USDC)).unwrap();

        assert_eq!(totals.source, TotalsSource::SecondaryLedger);
        assert_eq!(totals.confidence, Confidence::Confirmed);
        assert_eq!(totals.agree_total, 70 * USDC);
        assert_eq!(totals.disagree_total, 30 * USDC);
        assert_eq!(totals.grand_total, 100 * USDC);
        assert_eq!(totals.creator_position, Position::Yes);
    }

    #[test]
    fn unavailable_secondary_falls_back_to_registry_excess() {
        let totals = handler(&primary(20 * USDC, 100 * USDC), &LedgerRead::Unavailable).unwrap();

        assert_eq!(totals.source, TotalsSource::PrimaryExcess);
        assert!(totals.is_provisional());
        assert_eq!(totals.agree_total, 20 * USDC);
        assert_eq!(totals.disagree_total, 80 * USDC);
        assert_eq!(totals.grand_total, 100 * USDC);
    }

    #[test]
    fn empty_secondary_with_registry_excess_is_provisional() {
        let totals = handler(&primary(20 * USDC, 60 * USDC), &report(0, 0)).unwrap();

        assert_eq!(totals.source, TotalsSource::PrimaryExcess);
        assert!(totals.is_provisional());
        assert_eq!(totals.disagree_total, 40 * USDC);
    }

    #[test]
    fn creator_only_pool_is_confirmed_when_both_ledgers_agree() {
        let totals = handler(&primary(20 * USDC, 20 * USDC), &report(0, 0)).unwrap();

        assert_eq!(totals.source, TotalsSource::CreatorOnly);
        assert_eq!(totals.confidence, Confidence::Confirmed);
        assert_eq!(totals.agree_total, 20 * USDC);
        assert_eq!(totals.disagree_total, 0);
        assert_eq!(totals.grand_total, 20 * USDC);
    }

    #[test]
    fn creator_only_pool_is_provisional_without_secondary() {
        let totals = handler(&primary(20 * USDC, 20 * USDC), &LedgerRead::Unavailable).unwrap();
        assert_eq!(totals.source, TotalsSource::CreatorOnly);
        assert!(totals.is_provisional());
    }

    #[test]
    fn registry_total_below_creator_stake_is_ignored() {
        let totals = handler(&primary(20 * USDC, 5 * USDC), &report(0, 0)).unwrap();
        assert_eq!(totals.source, TotalsSource::CreatorOnly);
        assert_eq!(totals.grand_total, 20 * USDC);
    }

    #[test]
    fn inconsistent_secondary_report_is_rebalanced_and_flagged() {
        let secondary = LedgerRead::Available(SecondaryLedgerReport {
            agree_total: 10 * USDC,
            disagree_total: 15 * USDC,
            grand_total: 30 * USDC,
            staker_count: 3,
        });
        let totals = handler(&primary(20 * USDC, 50 * USDC), &secondary).unwrap();

        assert!(totals.is_provisional());
        assert_eq!(totals.grand_total, 45 * USDC);
        assert_eq!(totals.agree_total + totals.disagree_total, totals.grand_total);
    }

    #[test]
    fn missing_primary_is_an_error() {
        let err = handler(&LedgerRead::Unavailable, &report(1, 1)).unwrap_err();
        assert_eq!(err, AnalysisPoolError::PrimaryLedgerUnavailable.into());
    }

    #[test]
    fn declared_position_is_normalized() {
        let LedgerRead::Available(mut record) = primary(USDC, USDC) else {
            unreachable!()
        };
        record.declared_raw_position = true;
        let totals = handler(&LedgerRead::Available(record), &report(0, 0)).unwrap();
        assert_eq!(totals.creator_position, Position::No);
    }

    #[test]
    fn every_branch_conserves_totals() {
        let secondaries = [
            LedgerRead::Unavailable,
            report(0, 0),
            report(7 * USDC, 0),
            report(0, 9 * USDC),
            report(3 * USDC, 11 * USDC),
        ];
        for creator_stake in [USDC, 20 * USDC] {
            for grand in [0, USDC, 20 * USDC, 130 * USDC] {
                for secondary in &secondaries {
                    let totals = handler(&primary(creator_stake, grand), secondary).unwrap();
                    assert_eq!(
                        totals.agree_total + totals.disagree_total,
                        totals.grand_total
                    );
                    assert!(totals.agree_total >= totals.creator_stake);
                }
            }
        }
    }
}
