use anchor_lang::prelude::*;

use crate::errors::AnalysisPoolError;

/// ─── News Item ────────────────────────────────────────────────────
///
/// A resolvable real-world proposition. Pools hang off a news item and
/// cannot exist without one.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewsItem {
    /// Unique numeric identifier.
    pub news_id: u64,

    /// Who published the news item.
    pub creator: Pubkey,

    /// The only key allowed to resolve this item.
    pub resolver: Pubkey,

    /// Unix timestamp after which no new pools are accepted.
    pub resolution_deadline: i64,

    pub resolved: bool,

    /// Final outcome (only meaningful when `resolved`).
    pub outcome: NewsOutcome,

    /// Set together with `outcome`; source/notes may be amended later.
    pub resolution: Option<ResolutionMetadata>,
}

impl NewsItem {
    pub fn new(news_id: u64, creator: Pubkey, resolver: Pubkey, resolution_deadline: i64) -> Self {
        Self {
            news_id,
            creator,
            resolver,
            resolution_deadline,
            resolved: false,
            outcome: NewsOutcome::Unresolved,
            resolution: None,
        }
    }

    /// Whether new pools may still be opened at `now`.
    pub fn is_open(&self, now: i64) -> bool {
        !self.resolved && now < self.resolution_deadline
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResolutionMetadata {
    pub resolved_at: i64,
    pub resolved_by: Pubkey,
    /// Where the outcome was verified (URL, feed name, ...).
    pub source: String,
    pub notes: String,
}

/// ─── Analysis Pool ────────────────────────────────────────────────
///
/// One creator's stance on a news item, together with the stake backing
/// and opposing it.
///
/// # Invariant
/// `grand_total == agree_total + disagree_total`, and `agree_total`
/// always includes `creator_stake`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisPool {
    pub pool_id: u64,

    /// Parent news item.
    pub news_id: u64,

    pub creator: Pubkey,

    /// Creator's declared position, already normalized.
    pub position: Position,

    pub creator_stake: u64,

    // ─── Pool accounting ───
    /// Creator stake plus every `Agree` backer.
    pub agree_total: u64,

    /// Every `Disagree` staker.
    pub disagree_total: u64,

    pub grand_total: u64,

    // ─── Resolution ───
    pub resolved: bool,

    pub outcome: PoolOutcome,

    pub created_at: i64,

    pub resolved_at: Option<i64>,
}

impl AnalysisPool {
    /// Agree stake contributed by third-party backers only.
    pub fn backer_agree_total(&self) -> u64 {
        self.agree_total.saturating_sub(self.creator_stake)
    }

    /// Add a stake to the side it backs. Totals only ever grow.
    pub fn record_stake(&mut self, position: StakePosition, amount: u64) -> Result<()> {
        let grand_total = self
            .grand_total
            .checked_add(amount)
            .ok_or(AnalysisPoolError::Overflow)?;
        let side = match position {
            StakePosition::Agree => &mut self.agree_total,
            StakePosition::Disagree => &mut self.disagree_total,
        };
        *side = side.checked_add(amount).ok_or(AnalysisPoolError::Overflow)?;
        self.grand_total = grand_total;
        Ok(())
    }
}

/// ─── Stake ────────────────────────────────────────────────────────
///
/// One participant's backing of one pool. `amount` never changes;
/// `withdrawn` flips to true exactly once, either by a claim or by an
/// emergency exit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Stake {
    pub stake_id: u64,
    pub pool_id: u64,
    pub staker: Pubkey,
    pub position: StakePosition,
    pub amount: u64,
    pub created_at: i64,
    pub withdrawn: bool,
    /// Principal was pulled before resolution; the stake earns nothing and
    /// is left out of the staker's track record.
    pub exited_early: bool,
}

/// ─── Reputation Record ────────────────────────────────────────────
///
/// Derived from a participant's resolved history; never stored as a
/// source of truth.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReputationRecord {
    pub address: Pubkey,

    /// Resolved pools counted in this record.
    pub total_pools: u32,

    pub correct_pools: u32,

    pub wrong_pools: u32,

    /// `correct / total` as a rounded percentage (0-100).
    pub accuracy: u8,

    pub points: i64,

    pub current_streak: u32,

    pub best_streak: u32,

    pub tier: Tier,
}

impl ReputationRecord {
    pub fn empty(address: Pubkey) -> Self {
        Self {
            address,
            total_pools: 0,
            correct_pools: 0,
            wrong_pools: 0,
            accuracy: 0,
            points: 0,
            current_streak: 0,
            best_streak: 0,
            tier: Tier::Novice,
        }
    }
}

/// ─── Position ─────────────────────────────────────────────────────
///
/// Canonical YES/NO stance of a pool creator. The registry's raw encoding
/// is inverted; see `operations::normalize`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Position {
    Yes,
    No,
}

/// ─── News Outcome ─────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NewsOutcome {
    #[default]
    Unresolved,
    Yes,
    No,
}

impl From<Position> for NewsOutcome {
    fn from(position: Position) -> Self {
        match position {
            Position::Yes => NewsOutcome::Yes,
            Position::No => NewsOutcome::No,
        }
    }
}

/// ─── Stake Position ───────────────────────────────────────────────
///
/// Relative to the pool creator's stance, not to the news outcome.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StakePosition {
    Agree,
    Disagree,
}

/// ─── Pool Outcome ─────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PoolOutcome {
    #[default]
    Unresolved,
    CreatorCorrect,
    CreatorWrong,
}

/// ─── Stake Result ─────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StakeResult {
    Won,
    Lost,
    /// Pool has not resolved yet.
    Pending,
}

/// ─── Tier ─────────────────────────────────────────────────────────
///
/// Ordered lowest to highest; the derived `Ord` is the tier ordering.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default,
)]
pub enum Tier {
    #[default]
    Novice,
    Analyst,
    Expert,
    Master,
    Legend,
}
