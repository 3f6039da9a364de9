use anchor_lang::prelude::*;

use crate::config::EngineConfig;
use crate::errors::AnalysisPoolError;
use crate::ledger::ReconciledTotals;
use crate::operations::distribute::payout_for;
use crate::state::{PoolOutcome, StakePosition};

/// Best and worst case for a stake that has not been placed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardProjection {
    /// Always zero: a losing stake forfeits its principal.
    pub min_reward: u64,
    /// Payout if the stake's side wins.
    pub max_reward: u64,
    pub provisional: bool,
}

/// Totals as they would look after adding `amount` on `position`.
/// The caller's totals are copied, never touched.
pub fn with_hypothetical_stake(
    totals: &ReconciledTotals,
    position: StakePosition,
    amount: u64,
) -> Result<ReconciledTotals> {
    require!(amount > 0, AnalysisPoolError::ZeroAmount);

    let mut projected = *totals;
    match position {
        StakePosition::Agree => {
            projected.agree_total = projected
                .agree_total
                .checked_add(amount)
                .ok_or(AnalysisPoolError::Overflow)?;
        }
        StakePosition::Disagree => {
            projected.disagree_total = projected
                .disagree_total
                .checked_add(amount)
                .ok_or(AnalysisPoolError::Overflow)?;
        }
    }
    projected.grand_total = projected
        .grand_total
        .checked_add(amount)
        .ok_or(AnalysisPoolError::Overflow)?;
    Ok(projected)
}

/// "What would I receive if I staked `amount` now and the pool later
/// resolved to `assumed`?"
pub fn project_payout(
    config: &EngineConfig,
    totals: &ReconciledTotals,
    position: StakePosition,
    amount: u64,
    assumed: PoolOutcome,
) -> Result<u64> {
    require!(
        assumed != PoolOutcome::Unresolved,
        AnalysisPoolError::InvalidOutcome
    );
    let projected = with_hypothetical_stake(totals, position, amount)?;
    payout_for(config, &projected, assumed, position, amount)
}

/// Min/max projection for a prospective stake.
pub fn handler(
    config: &EngineConfig,
    totals: &ReconciledTotals,
    position: StakePosition,
    amount: u64,
) -> Result<RewardProjection> {
    let winning = match position {
        StakePosition::Agree => PoolOutcome::CreatorCorrect,
        StakePosition::Disagree => PoolOutcome::CreatorWrong,
    };
    let max_reward = project_payout(config, totals, position, amount, winning)?;

    Ok(RewardProjection {
        min_reward: 0,
        max_reward,
        provisional: totals.is_provisional(),
    })
}
