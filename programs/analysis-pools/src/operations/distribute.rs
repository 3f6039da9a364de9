use anchor_lang::prelude::*;

use crate::config::EngineConfig;
use crate::constants::BPS_DENOMINATOR;
use crate::errors::AnalysisPoolError;
use crate::ledger::ReconciledTotals;
use crate::math::{apply_bps, mul_div_floor};
use crate::operations::classify;
use crate::state::*;

/// How a resolved pool's grand total is carved up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSplit {
    pub grand_total: u64,
    /// Platform fee (`grand_total - remaining`).
    pub fee: u64,
    /// Post-fee amount available to creator and winners.
    pub remaining: u64,
    /// Fixed creator reward; zero when the creator was wrong.
    pub creator_reward: u64,
    /// Shared pro-rata by the winning stakers.
    pub stakers_pool: u64,
}

/// Outcome of settling a single stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeSettlement {
    pub stake_id: u64,
    pub result: StakeResult,
    pub payout: u64,
    /// Copied from the totals; a provisional payout is an estimate.
    pub provisional: bool,
}

/// Every entitlement of a resolved pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub split: PoolSplit,
    pub settlements: Vec<StakeSettlement>,
    /// Creator reward plus every stake payout.
    pub distributed: u64,
    /// Truncation dust plus any pool nobody was entitled to.
    pub residue: u64,
}

/// Split a pool's grand total under `outcome`.
///
///   remaining     = grand × (1 − fee)
///   creator wrong : stakers_pool = remaining, creator_reward = 0
///   creator right : stakers_pool = remaining × staker_share,
///                   creator_reward = remaining × creator_share
///
/// All divisions truncate, so `creator_reward + stakers_pool <= remaining`.
pub fn split_pool(
    config: &EngineConfig,
    totals: &ReconciledTotals,
    outcome: PoolOutcome,
) -> Result<PoolSplit> {
    let keep_bps = (BPS_DENOMINATOR as u16).saturating_sub(config.fee_bps);
    let remaining = apply_bps(totals.grand_total, keep_bps)?;
    let fee = totals.grand_total - remaining;

    let (creator_reward, stakers_pool) = match outcome {
        PoolOutcome::Unresolved => return err!(AnalysisPoolError::PoolNotResolved),
        PoolOutcome::CreatorWrong => (0, remaining),
        PoolOutcome::CreatorCorrect => (
            apply_bps(remaining, config.creator_share_bps)?,
            apply_bps(remaining, config.staker_share_bps())?,
        ),
    };

    Ok(PoolSplit {
        grand_total: totals.grand_total,
        fee,
        remaining,
        creator_reward,
        stakers_pool,
    })
}

/// Stake sharing the winners' pool under `outcome`. The creator's own
/// stake is never part of it: the creator is paid separately.
pub fn winning_denominator(totals: &ReconciledTotals, outcome: PoolOutcome) -> u64 {
    match classify::winning_side(outcome) {
        Some(StakePosition::Agree) => totals.backer_agree_total(),
        Some(StakePosition::Disagree) => totals.disagree_total,
        None => 0,
    }
}

/// Backer stake recorded on `position`'s side.
fn side_total(totals: &ReconciledTotals, position: StakePosition) -> u64 {
    match position {
        StakePosition::Agree => totals.backer_agree_total(),
        StakePosition::Disagree => totals.disagree_total,
    }
}

/// Payout for a backer stake of `amount` on `position` once the pool has
/// resolved to `outcome`. Losers get zero; winners get their pro-rata share
/// of the stakers pool, truncated.
pub fn payout_for(
    config: &EngineConfig,
    totals: &ReconciledTotals,
    outcome: PoolOutcome,
    position: StakePosition,
    amount: u64,
) -> Result<u64> {
    require!(amount > 0, AnalysisPoolError::ZeroAmount);
    require!(
        amount <= side_total(totals, position),
        AnalysisPoolError::StakeExceedsPoolTotal
    );

    match classify::handler(outcome, position) {
        StakeResult::Pending => err!(AnalysisPoolError::PoolNotResolved),
        StakeResult::Lost => Ok(0),
        StakeResult::Won => {
            let split = split_pool(config, totals, outcome)?;
            mul_div_floor(split.stakers_pool, amount, winning_denominator(totals, outcome))
        }
    }
}

/// Reject totals reconciled for some other pool.
fn require_totals_match(pool: &AnalysisPool, totals: &ReconciledTotals) -> Result<()> {
    require!(
        totals.creator_stake == pool.creator_stake
            && totals.creator_position == pool.position
            && totals.agree_total == pool.agree_total
            && totals.disagree_total == pool.disagree_total
            && totals.grand_total == pool.grand_total,
        AnalysisPoolError::TotalsMismatch
    );
    Ok(())
}

/// Settle one stake of a resolved pool. Pure: the stake is not marked.
pub fn settle_stake(
    config: &EngineConfig,
    pool: &AnalysisPool,
    totals: &ReconciledTotals,
    stake: &Stake,
) -> Result<StakeSettlement> {
    require!(
        stake.pool_id == pool.pool_id,
        AnalysisPoolError::StakeNotInPool
    );
    require!(pool.resolved, AnalysisPoolError::PoolNotResolved);
    require!(!stake.withdrawn, AnalysisPoolError::AlreadyWithdrawn);
    require_totals_match(pool, totals)?;

    let payout = payout_for(config, totals, pool.outcome, stake.position, stake.amount)?;

    Ok(StakeSettlement {
        stake_id: stake.stake_id,
        result: classify::handler(pool.outcome, stake.position),
        payout,
        provisional: totals.is_provisional(),
    })
}

/// The creator's fixed reward on a resolved pool. A wrong creator forfeits
/// their stake and receives nothing.
pub fn creator_reward(
    config: &EngineConfig,
    pool: &AnalysisPool,
    totals: &ReconciledTotals,
) -> Result<u64> {
    require!(pool.resolved, AnalysisPoolError::PoolNotResolved);
    require_totals_match(pool, totals)?;
    Ok(split_pool(config, totals, pool.outcome)?.creator_reward)
}

/// Finalize a stake's payout and mark it withdrawn.
///
/// Unlike `settle_stake` this refuses provisional totals.
pub fn claim_payout(
    config: &EngineConfig,
    pool: &AnalysisPool,
    totals: &ReconciledTotals,
    stake: &mut Stake,
) -> Result<u64> {
    require!(
        !totals.is_provisional(),
        AnalysisPoolError::ProvisionalTotals
    );
    let settlement = settle_stake(config, pool, totals, stake)?;

    stake.withdrawn = true;

    msg!(
        "Claimed: staker={} stake #{} result={:?} payout={} (pool #{})",
        stake.staker,
        stake.stake_id,
        settlement.result,
        settlement.payout,
        pool.pool_id,
    );

    Ok(settlement.payout)
}

/// Compute every entitlement of a resolved pool and check that nothing is
/// overpaid.
///
/// `stakes` may be a subset of the pool's backers, but per side they can
/// never add up to more than the reconciled totals. Stakes that exited
/// early still count toward their side but are paid nothing; their share
/// stays in the residue.
pub fn distribute_pool(
    config: &EngineConfig,
    pool: &AnalysisPool,
    totals: &ReconciledTotals,
    stakes: &[Stake],
) -> Result<Distribution> {
    require!(pool.resolved, AnalysisPoolError::PoolNotResolved);
    require_totals_match(pool, totals)?;

    let mut agree_sum: u64 = 0;
    let mut disagree_sum: u64 = 0;
    for stake in stakes {
        require!(
            stake.pool_id == pool.pool_id,
            AnalysisPoolError::StakeNotInPool
        );
        let sum = match stake.position {
            StakePosition::Agree => &mut agree_sum,
            StakePosition::Disagree => &mut disagree_sum,
        };
        *sum = sum
            .checked_add(stake.amount)
            .ok_or(AnalysisPoolError::Overflow)?;
    }
    require!(
        agree_sum <= totals.backer_agree_total() && disagree_sum <= totals.disagree_total,
        AnalysisPoolError::StakeExceedsPoolTotal
    );

    let split = split_pool(config, totals, pool.outcome)?;

    let mut distributed = split.creator_reward;
    let mut settlements = Vec::with_capacity(stakes.len());
    for stake in stakes {
        let payout = if stake.exited_early {
            0
        } else {
            payout_for(config, totals, pool.outcome, stake.position, stake.amount)?
        };
        distributed = distributed
            .checked_add(payout)
            .ok_or(AnalysisPoolError::Overflow)?;
        settlements.push(StakeSettlement {
            stake_id: stake.stake_id,
            result: classify::handler(pool.outcome, stake.position),
            payout,
            provisional: totals.is_provisional(),
        });
    }

    // Invariant: truncation can only leave dust behind, never create value.
    require!(
        distributed <= split.remaining,
        AnalysisPoolError::Overpayment
    );
    let residue = split.remaining - distributed;

    msg!(
        "Pool #{} distributed: outcome={:?} fee={} creator={} stakers={} residue={}",
        pool.pool_id,
        pool.outcome,
        split.fee,
        split.creator_reward,
        distributed - split.creator_reward,
        residue,
    );

    Ok(Distribution {
        split,
        settlements,
        distributed,
        residue,
    })
}
