use anchor_lang::prelude::*;

use crate::config::EngineConfig;
use crate::constants::{BASE_POOL_POINTS, MULTIPLIER_ONE_X};
use crate::errors::AnalysisPoolError;
use crate::operations::classify;
use crate::state::*;

/// One resolved (or still pending) pool in a participant's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub pool_id: u64,
    pub result: StakeResult,
    /// Stake the participant had on the pool, used for the multiplier.
    pub stake_amount: Option<u64>,
    pub created_at: i64,
    pub resolved_at: i64,
}

impl HistoryEntry {
    /// The creator's entry for a pool they opened. A creator always agrees
    /// with their own stance.
    pub fn created(pool: &AnalysisPool) -> Self {
        Self {
            pool_id: pool.pool_id,
            result: classify::handler(pool.outcome, StakePosition::Agree),
            stake_amount: Some(pool.creator_stake),
            created_at: pool.created_at,
            resolved_at: pool.resolved_at.unwrap_or(pool.created_at),
        }
    }

    /// A backer's entry for a stake on `pool`.
    pub fn backed(pool: &AnalysisPool, stake: &Stake) -> Result<Self> {
        require!(
            stake.pool_id == pool.pool_id,
            AnalysisPoolError::StakeNotInPool
        );
        Ok(Self {
            pool_id: pool.pool_id,
            result: classify::handler(pool.outcome, stake.position),
            stake_amount: Some(stake.amount),
            created_at: stake.created_at,
            resolved_at: pool.resolved_at.unwrap_or(stake.created_at),
        })
    }
}

/// Whether stake size scales the points of each pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Every pool counts at 1.0x.
    Flat,
    /// Multiplier looked up in `EngineConfig::multiplier_schedule`.
    StakeWeighted,
}

/// Every pool `address` created, as history entries.
pub fn creator_history(address: &Pubkey, pools: &[AnalysisPool]) -> Vec<HistoryEntry> {
    pools
        .iter()
        .filter(|pool| pool.creator == *address)
        .map(HistoryEntry::created)
        .collect()
}

/// Every stake `address` placed, joined with its pool. Stakes pulled out
/// by an emergency exit are not part of the record.
pub fn backer_history(
    address: &Pubkey,
    pools: &[AnalysisPool],
    stakes: &[Stake],
) -> Result<Vec<HistoryEntry>> {
    stakes
        .iter()
        .filter(|stake| stake.staker == *address && !stake.exited_early)
        .map(|stake| {
            let pool = pools
                .iter()
                .find(|pool| pool.pool_id == stake.pool_id)
                .ok_or(AnalysisPoolError::StakeNotInPool)?;
            HistoryEntry::backed(pool, stake)
        })
        .collect()
}

/// Points for one resolved entry: `±100 × multiplier`, wrong results
/// further scaled by the configured penalty.
fn entry_points(config: &EngineConfig, entry: &HistoryEntry, weighting: Weighting) -> Result<i64> {
    let multiplier = i128::from(match weighting {
        Weighting::Flat => MULTIPLIER_ONE_X,
        Weighting::StakeWeighted => config.multiplier_for(entry.stake_amount),
    });
    let one_x = MULTIPLIER_ONE_X as i128;
    let base = BASE_POOL_POINTS as i128;

    let points = match entry.result {
        StakeResult::Won => base * multiplier / one_x,
        StakeResult::Lost => -(base * multiplier * config.wrong_penalty_bps as i128 / (one_x * one_x)),
        StakeResult::Pending => 0,
    };
    i64::try_from(points).map_err(|_| error!(AnalysisPoolError::Overflow))
}

/// Rebuild a participant's reputation from their history.
///
/// Pending entries are ignored. Entries are ordered by resolution time
/// (then creation time, then pool id) before streaks are walked.
pub fn handler(
    config: &EngineConfig,
    address: Pubkey,
    history: &[HistoryEntry],
    weighting: Weighting,
) -> Result<ReputationRecord> {
    let mut resolved: Vec<&HistoryEntry> = history
        .iter()
        .filter(|entry| entry.result != StakeResult::Pending)
        .collect();
    resolved.sort_by_key(|entry| (entry.resolved_at, entry.created_at, entry.pool_id));

    let mut record = ReputationRecord::empty(address);
    let mut run: u32 = 0;

    for entry in resolved {
        record.total_pools += 1;
        if entry.result == StakeResult::Won {
            record.correct_pools += 1;
            run += 1;
            record.best_streak = record.best_streak.max(run);
        } else {
            record.wrong_pools += 1;
            run = 0;
        }
        record.points = record
            .points
            .checked_add(entry_points(config, entry, weighting)?)
            .ok_or(AnalysisPoolError::Overflow)?;
    }
    record.current_streak = run;

    if record.total_pools > 0 {
        let total = record.total_pools as u64;
        // Round half up.
        record.accuracy = ((record.correct_pools as u64 * 100 + total / 2) / total) as u8;
    }
    record.tier = config.tier_for(record.points, record.total_pools);

    msg!(
        "Reputation {}: pools={} accuracy={}% points={} streak={}/{} tier={:?}",
        record.address,
        record.total_pools,
        record.accuracy,
        record.points,
        record.current_streak,
        record.best_streak,
        record.tier,
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRECISION;

    fn entry(pool_id: u64, won: bool, resolved_at: i64) -> HistoryEntry {
        HistoryEntry {
            pool_id,
            result: if won { StakeResult::Won } else { StakeResult::Lost },
            stake_amount: Some(PRECISION),
            created_at: resolved_at - 10,
            resolved_at,
        }
    }

    fn score(history: &[HistoryEntry]) -> ReputationRecord {
        handler(
            &EngineConfig::default(),
            Pubkey::new_unique(),
            history,
            Weighting::Flat,
        )
        .unwrap()
    }

    #[test]
    fn empty_history_is_novice() {
        let record = score(&[]);
        assert_eq!(record.total_pools, 0);
        assert_eq!(record.accuracy, 0);
        assert_eq!(record.points, 0);
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.best_streak, 0);
        assert_eq!(record.tier, Tier::Novice);
    }

    #[test]
    fn eight_of_ten_is_master() {
        let history: Vec<_> = (0..10)
            .map(|i| entry(i, i != 2 && i != 6, 1_000 + i as i64))
            .collect();
        let record = score(&history);

        assert_eq!(record.total_pools, 10);
        assert_eq!(record.correct_pools, 8);
        assert_eq!(record.wrong_pools, 2);
        assert_eq!(record.accuracy, 80);
        assert_eq!(record.points, 600);
        assert_eq!(record.tier, Tier::Master);
        assert_eq!(record.current_streak, 3);
        assert_eq!(record.best_streak, 3);
    }

    #[test]
    fn streaks_follow_resolution_order_not_input_order() {
        // Chronologically: W W W L W W
        let history = [
            entry(6, true, 600),
            entry(1, true, 100),
            entry(4, false, 400),
            entry(5, true, 500),
            entry(2, true, 200),
            entry(3, true, 300),
        ];
        let record = score(&history);
        assert_eq!(record.current_streak, 2);
        assert_eq!(record.best_streak, 3);
    }

    #[test]
    fn latest_loss_resets_current_streak() {
        let history = [entry(1, true, 100), entry(2, true, 200), entry(3, false, 300)];
        let record = score(&history);
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.best_streak, 2);
        assert_eq!(record.points, 100);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        // 2 of 3 = 66.67
        let record = score(&[entry(1, true, 1), entry(2, true, 2), entry(3, false, 3)]);
        assert_eq!(record.accuracy, 67);
        // 1 of 8 = 12.5
        let history: Vec<_> = (0..8).map(|i| entry(i, i == 0, i as i64 + 1)).collect();
        assert_eq!(score(&history).accuracy, 13);
    }

    #[test]
    fn pending_entries_are_ignored() {
        let mut pending = entry(9, true, 900);
        pending.result = StakeResult::Pending;
        let record = score(&[entry(1, true, 100), pending]);
        assert_eq!(record.total_pools, 1);
        assert_eq!(record.points, 100);
    }

    #[test]
    fn stake_weighting_uses_schedule() {
        let config = EngineConfig::default();
        let mut big_win = entry(1, true, 100);
        big_win.stake_amount = Some(1_000 * PRECISION);
        let mut mid_loss = entry(2, false, 200);
        mid_loss.stake_amount = Some(150 * PRECISION);

        let record = handler(
            &config,
            Pubkey::new_unique(),
            &[big_win, mid_loss],
            Weighting::StakeWeighted,
        )
        .unwrap();
        assert_eq!(record.points, 300 - 150);
    }

    #[test]
    fn smaller_wrong_penalty_softens_losses() {
        let config = EngineConfig {
            wrong_penalty_bps: 5_000,
            ..EngineConfig::default()
        };
        let record = handler(
            &config,
            Pubkey::new_unique(),
            &[entry(1, false, 100), entry(2, false, 200)],
            Weighting::Flat,
        )
        .unwrap();
        assert_eq!(record.points, -100);
        assert_eq!(record.tier, Tier::Novice);
    }

    #[test]
    fn histories_are_built_from_pools_and_stakes() {
        let creator = Pubkey::new_unique();
        let backer = Pubkey::new_unique();
        let pool = |pool_id: u64, outcome: PoolOutcome| AnalysisPool {
            pool_id,
            news_id: 1,
            creator,
            position: Position::Yes,
            creator_stake: 5 * PRECISION,
            agree_total: 5 * PRECISION,
            disagree_total: 0,
            grand_total: 5 * PRECISION,
            resolved: outcome != PoolOutcome::Unresolved,
            outcome,
            created_at: pool_id as i64,
            resolved_at: Some(pool_id as i64 + 100),
        };
        let pools = [
            pool(1, PoolOutcome::CreatorCorrect),
            pool(2, PoolOutcome::CreatorWrong),
            pool(3, PoolOutcome::Unresolved),
        ];
        let stakes = [Stake {
            stake_id: 1,
            pool_id: 2,
            staker: backer,
            position: StakePosition::Disagree,
            amount: PRECISION,
            created_at: 50,
            withdrawn: false,
            exited_early: false,
        }];

        let created = creator_history(&creator, &pools);
        assert_eq!(created.len(), 3);
        let record = handler(&EngineConfig::default(), creator, &created, Weighting::Flat).unwrap();
        assert_eq!((record.correct_pools, record.wrong_pools), (1, 1));

        let backed = backer_history(&backer, &pools, &stakes).unwrap();
        assert_eq!(backed[0].result, StakeResult::Won);

        let exited = Stake {
            withdrawn: true,
            exited_early: true,
            ..stakes[0].clone()
        };
        assert!(backer_history(&backer, &pools, &[exited]).unwrap().is_empty());

        let orphan = Stake { pool_id: 42, ..stakes[0].clone() };
        assert_eq!(
            backer_history(&backer, &pools, &[orphan]).unwrap_err(),
            AnalysisPoolError::StakeNotInPool.into()
        );
    }
}
