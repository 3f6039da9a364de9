use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::AnalysisPoolError;
use crate::state::Tier;

/// ─── Engine Config ────────────────────────────────────────────────
///
/// Protocol-level settlement and scoring parameters. Every calculation
/// takes the config by reference; nothing here is mutated at runtime.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Platform fee on the grand total, in basis points (200 = 2%).
    pub fee_bps: u16,

    /// Creator's cut of the post-fee remainder when correct (2000 = 20%).
    pub creator_share_bps: u16,

    /// Smallest creator stake that opens a pool.
    pub min_pool_stake: u64,

    /// Stake-size multiplier steps, ascending by `min_stake`.
    pub multiplier_schedule: Vec<MultiplierStep>,

    /// Scales the penalty of a wrong pool (10_000 = same weight as a win).
    pub wrong_penalty_bps: u16,

    /// Point thresholds, ascending by tier.
    pub tier_thresholds: Vec<TierThreshold>,

    /// Resolved pools required before `Tier::Legend` applies.
    pub legend_min_pools: u32,
}

/// One row of the stake multiplier schedule: stakes of at least `min_stake`
/// score at `multiplier_bps`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiplierStep {
    pub min_stake: u64,
    pub multiplier_bps: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierThreshold {
    pub tier: Tier,
    pub min_points: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            creator_share_bps: DEFAULT_CREATOR_SHARE_BPS,
            min_pool_stake: DEFAULT_MIN_POOL_STAKE,
            multiplier_schedule: vec![
                MultiplierStep { min_stake: 0, multiplier_bps: 10_000 },
                MultiplierStep { min_stake: 100 * PRECISION, multiplier_bps: 15_000 },
                MultiplierStep { min_stake: 500 * PRECISION, multiplier_bps: 20_000 },
                MultiplierStep { min_stake: 1_000 * PRECISION, multiplier_bps: 30_000 },
            ],
            wrong_penalty_bps: MULTIPLIER_ONE_X,
            tier_thresholds: vec![
                TierThreshold { tier: Tier::Analyst, min_points: 100 },
                TierThreshold { tier: Tier::Expert, min_points: 250 },
                TierThreshold { tier: Tier::Master, min_points: 500 },
                TierThreshold { tier: Tier::Legend, min_points: 1_000 },
            ],
            legend_min_pools: DEFAULT_LEGEND_MIN_POOLS,
        }
    }
}

impl EngineConfig {
    /// Backers' share of the post-fee remainder when the creator is correct.
    pub fn staker_share_bps(&self) -> u16 {
        (BPS_DENOMINATOR as u16).saturating_sub(self.creator_share_bps)
    }

    /// Reject schedules the scoring and payout math cannot honor.
    pub fn validate(&self) -> Result<()> {
        require!(
            (self.fee_bps as u64) <= BPS_DENOMINATOR,
            AnalysisPoolError::InvalidConfig
        );
        require!(
            (self.creator_share_bps as u64) <= BPS_DENOMINATOR,
            AnalysisPoolError::InvalidConfig
        );
        require!(
            self.wrong_penalty_bps <= MULTIPLIER_ONE_X,
            AnalysisPoolError::InvalidConfig
        );
        require!(self.min_pool_stake > 0, AnalysisPoolError::InvalidConfig);

        // Schedule must start at zero so every stake maps to a step.
        let first = self
            .multiplier_schedule
            .first()
            .ok_or(AnalysisPoolError::InvalidConfig)?;
        require!(first.min_stake == 0, AnalysisPoolError::InvalidConfig);
        for step in &self.multiplier_schedule {
            require!(step.multiplier_bps > 0, AnalysisPoolError::InvalidConfig);
        }
        for pair in self.multiplier_schedule.windows(2) {
            require!(
                pair[0].min_stake < pair[1].min_stake,
                AnalysisPoolError::InvalidConfig
            );
        }

        for threshold in &self.tier_thresholds {
            require!(
                threshold.tier != Tier::Novice && threshold.min_points > 0,
                AnalysisPoolError::InvalidConfig
            );
        }
        for pair in self.tier_thresholds.windows(2) {
            require!(
                pair[0].tier < pair[1].tier && pair[0].min_points < pair[1].min_points,
                AnalysisPoolError::InvalidConfig
            );
        }
        Ok(())
    }

    /// Multiplier (bps) for a pool backed by `stake`. Pools without a
    /// recorded stake score at 1.0x.
    pub fn multiplier_for(&self, stake: Option<u64>) -> u16 {
        let Some(stake) = stake else {
            return MULTIPLIER_ONE_X;
        };
        self.multiplier_schedule
            .iter()
            .take_while(|step| step.min_stake <= stake)
            .last()
            .map_or(MULTIPLIER_ONE_X, |step| step.multiplier_bps)
    }

    /// Highest tier whose threshold `points` reaches. Legend additionally
    /// needs `legend_min_pools` resolved pools; short of that the next
    /// qualifying tier applies.
    pub fn tier_for(&self, points: i64, total_pools: u32) -> Tier {
        self.tier_thresholds
            .iter()
            .filter(|t| points >= t.min_points)
            .filter(|t| t.tier != Tier::Legend || total_pools >= self.legend_min_pools)
            .map(|t| t.tier)
            .max()
            .unwrap_or(Tier::Novice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.staker_share_bps(), 8_000);
    }

    #[test]
    fn rejects_unsorted_schedule() {
        let mut config = EngineConfig::default();
        config.multiplier_schedule.swap(1, 2);
        assert_eq!(
            config.validate().unwrap_err(),
            AnalysisPoolError::InvalidConfig.into()
        );
    }

    #[test]
    fn rejects_schedule_not_starting_at_zero() {
        let mut config = EngineConfig::default();
        config.multiplier_schedule.remove(0);
        assert!(config.validate().is_err());

        config.multiplier_schedule.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_penalty_above_one_x() {
        let config = EngineConfig {
            wrong_penalty_bps: 12_000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_fee_above_hundred_percent() {
        let config = EngineConfig {
            fee_bps: 10_001,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn multiplier_steps() {
        let config = EngineConfig::default();
        assert_eq!(config.multiplier_for(None), 10_000);
        assert_eq!(config.multiplier_for(Some(0)), 10_000);
        assert_eq!(config.multiplier_for(Some(100 * PRECISION - 1)), 10_000);
        assert_eq!(config.multiplier_for(Some(100 * PRECISION)), 15_000);
        assert_eq!(config.multiplier_for(Some(750 * PRECISION)), 20_000);
        assert_eq!(config.multiplier_for(Some(5_000 * PRECISION)), 30_000);
    }

    #[test]
    fn tier_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.tier_for(-300, 5), Tier::Novice);
        assert_eq!(config.tier_for(99, 5), Tier::Novice);
        assert_eq!(config.tier_for(100, 5), Tier::Analyst);
        assert_eq!(config.tier_for(250, 5), Tier::Expert);
        assert_eq!(config.tier_for(600, 10), Tier::Master);
        assert_eq!(config.tier_for(1_000, 20), Tier::Legend);
    }

    #[test]
    fn legend_requires_pool_count() {
        let config = EngineConfig::default();
        assert_eq!(config.tier_for(5_000, 19), Tier::Master);
        assert_eq!(config.tier_for(5_000, 20), Tier::Legend);
    }

    #[test]
    fn tier_is_monotonic_in_points() {
        let config = EngineConfig::default();
        for total in [0, 10, 20, 50] {
            let mut previous = Tier::Novice;
            for points in (-500..=2_000).step_by(25) {
                let tier = config.tier_for(points, total);
                assert!(tier >= previous, "points={points} total={total}");
                previous = tier;
            }
        }
    }

    #[test]
    fn config_round_trips_through_borsh() {
        let config = EngineConfig::default();
        let mut bytes = Vec::new();
        config.serialize(&mut bytes).unwrap();
        assert_eq!(EngineConfig::try_from_slice(&bytes).unwrap(), config);
    }
}
