use anchor_lang::prelude::*;

use crate::config::EngineConfig;
use crate::errors::AnalysisPoolError;
use crate::ledger::{PrimaryLedgerRecord, ReconciledTotals};
use crate::operations::classify::derive_pool_outcome;
use crate::operations::normalize::{normalize_outcome, normalize_position};
use crate::state::*;

/// Parameters for opening a new analysis pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreatePoolParams {
    pub pool_id: u64,
    pub creator: Pubkey,
    /// Creator's stance on the news item.
    pub position: Position,
    pub creator_stake: u64,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

/// Parameters for backing or opposing a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PlaceStakeParams {
    pub stake_id: u64,
    pub staker: Pubkey,
    pub position: StakePosition,
    pub amount: u64,
    pub created_at: i64,
}

/// Open a pool on `news`. The creator stake seeds both the agree side and
/// the grand total.
pub fn create_pool(
    config: &EngineConfig,
    news: &NewsItem,
    params: CreatePoolParams,
) -> Result<AnalysisPool> {
    require!(!news.resolved, AnalysisPoolError::NewsAlreadyResolved);
    require!(
        news.is_open(params.created_at),
        AnalysisPoolError::NewsDeadlinePassed
    );
    require!(params.creator_stake > 0, AnalysisPoolError::ZeroAmount);
    require!(
        params.creator_stake >= config.min_pool_stake,
        AnalysisPoolError::StakeBelowMinimum
    );

    let pool = AnalysisPool {
        pool_id: params.pool_id,
        news_id: news.news_id,
        creator: params.creator,
        position: params.position,
        creator_stake: params.creator_stake,
        agree_total: params.creator_stake,
        disagree_total: 0,
        grand_total: params.creator_stake,
        resolved: false,
        outcome: PoolOutcome::Unresolved,
        created_at: params.created_at,
        resolved_at: None,
    };

    msg!(
        "Pool #{} created on news #{}: creator={} position={:?} stake={}",
        pool.pool_id,
        pool.news_id,
        pool.creator,
        pool.position,
        pool.creator_stake,
    );

    Ok(pool)
}

/// Add a stake to an open pool.
pub fn place_stake(pool: &mut AnalysisPool, params: PlaceStakeParams) -> Result<Stake> {
    require!(!pool.resolved, AnalysisPoolError::PoolAlreadyResolved);
    require!(params.amount > 0, AnalysisPoolError::ZeroAmount);
    require_keys_neq!(
        params.staker,
        pool.creator,
        AnalysisPoolError::CreatorSelfStake
    );

    pool.record_stake(params.position, params.amount)?;

    msg!(
        "Stake placed: {} on {:?} for pool #{} (agree={} disagree={})",
        params.amount,
        params.position,
        pool.pool_id,
        pool.agree_total,
        pool.disagree_total,
    );

    Ok(Stake {
        stake_id: params.stake_id,
        pool_id: pool.pool_id,
        staker: params.staker,
        position: params.position,
        amount: params.amount,
        created_at: params.created_at,
        withdrawn: false,
        exited_early: false,
    })
}

/// Pull a stake out before resolution. The principal comes back; any claim
/// on the reward is forfeited. Pool totals are not reduced.
pub fn emergency_withdraw(pool: &AnalysisPool, stake: &mut Stake) -> Result<u64> {
    require!(
        stake.pool_id == pool.pool_id,
        AnalysisPoolError::StakeNotInPool
    );
    require!(!pool.resolved, AnalysisPoolError::PoolAlreadyResolved);
    require!(!stake.withdrawn, AnalysisPoolError::AlreadyWithdrawn);

    stake.withdrawn = true;
    stake.exited_early = true;

    msg!(
        "Emergency exit: {} returned to {} from pool #{}",
        stake.amount,
        stake.staker,
        pool.pool_id,
    );

    Ok(stake.amount)
}

/// Build the domain view of a pool from its registry record and the
/// reconciled totals.
///
/// The registry does not record when a pool resolved, so the caller passes
/// it in. It is dropped unless the record says the pool is resolved.
pub fn assemble_pool(
    pool_id: u64,
    news_id: u64,
    created_at: i64,
    resolved_at: Option<i64>,
    primary: &PrimaryLedgerRecord,
    totals: &ReconciledTotals,
) -> AnalysisPool {
    let position = normalize_position(primary.declared_raw_position);
    let news_outcome = normalize_outcome(primary.resolved, primary.raw_outcome);

    AnalysisPool {
        pool_id,
        news_id,
        creator: primary.creator,
        position,
        creator_stake: totals.creator_stake,
        agree_total: totals.agree_total,
        disagree_total: totals.disagree_total,
        grand_total: totals.grand_total,
        resolved: primary.resolved,
        outcome: derive_pool_outcome(position, news_outcome),
        created_at,
        resolved_at: resolved_at.filter(|_| primary.resolved),
    }
}
