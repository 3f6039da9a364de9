//! Settlement core for news analysis pools.
//!
//! A creator opens a pool with a YES/NO stance on a news item and a stake;
//! others stake `agree` or `disagree`. This crate reconciles the two ledgers
//! that report pool totals, classifies stakes once the news resolves,
//! computes fee/creator/backer payouts in fixed-point, and rebuilds each
//! participant's reputation from history.
//!
//! Every operation is a pure function over value objects. Fetching records
//! and moving funds are the caller's business.

use anchor_lang::prelude::*;

pub mod config;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod math;
pub mod operations;
pub mod state;

pub use config::EngineConfig;
pub use errors::AnalysisPoolError;
pub use ledger::*;
pub use math::{format_amount, parse_amount};
pub use operations::*;
pub use state::*;

/// Merge the pool registry aggregate with the per-staker ledger.
///
/// Either source may be unavailable. A missing secondary ledger falls back
/// to registry figures flagged `Confidence::Provisional`; a missing
/// registry record is an error.
pub fn reconcile_stakes(
    primary: &LedgerRead<PrimaryLedgerRecord>,
    secondary: &LedgerRead<SecondaryLedgerReport>,
) -> Result<ReconciledTotals> {
    operations::reconcile::handler(primary, secondary)
}

/// Classify a stake as won, lost, or pending.
pub fn classify_stake(outcome: PoolOutcome, position: StakePosition) -> StakeResult {
    operations::classify::handler(outcome, position)
}

/// Best/worst case for staking `amount` on `position` now.
///
/// Evaluated on a copy of the totals enlarged by the hypothetical stake;
/// the caller's totals are untouched.
pub fn project_reward(
    config: &EngineConfig,
    totals: &ReconciledTotals,
    position: StakePosition,
    amount: u64,
) -> Result<RewardProjection> {
    operations::project::handler(config, totals, position, amount)
}

/// Derive a participant's reputation record from their resolved history.
pub fn score_reputation(
    config: &EngineConfig,
    address: Pubkey,
    history: &[HistoryEntry],
    weighting: Weighting,
) -> Result<ReputationRecord> {
    operations::reputation::handler(config, address, history, weighting)
}
