use anchor_lang::prelude::*;

/// Error codes for the analysis pool settlement engine.
///
/// Error codes are offset from 6000 (Anchor convention).
#[error_code]
pub enum AnalysisPoolError {
    /// Stake or pool amount must be greater than zero.
    #[msg("Amount must be > 0")]
    ZeroAmount,

    /// Creator stake is below the configured pool minimum.
    #[msg("Creator stake below pool minimum")]
    StakeBelowMinimum,

    /// Decimal amount could not be parsed (negative, malformed, or too precise).
    #[msg("Invalid decimal amount")]
    InvalidAmount,

    /// The stake references a different pool.
    #[msg("Stake does not belong to this pool")]
    StakeNotInPool,

    /// The pool references a different news item.
    #[msg("Pool does not belong to this news item")]
    PoolNotInNewsItem,

    /// A stake is larger than the total recorded for its side.
    #[msg("Stake exceeds the recorded side total")]
    StakeExceedsPoolTotal,

    /// Pool creators cannot back their own pool.
    #[msg("Creator cannot stake on their own pool")]
    CreatorSelfStake,

    /// Stake has already been withdrawn or claimed.
    #[msg("Stake already withdrawn")]
    AlreadyWithdrawn,

    /// Payout finalization was requested before the pool resolved.
    #[msg("Pool is not resolved")]
    PoolNotResolved,

    /// Pool is already resolved; no further stakes or resolutions.
    #[msg("Pool already resolved")]
    PoolAlreadyResolved,

    /// News item has not been resolved yet.
    #[msg("News item is not resolved")]
    NewsNotResolved,

    /// News item has already been resolved.
    #[msg("News item already resolved")]
    NewsAlreadyResolved,

    /// News item no longer accepts new pools.
    #[msg("News item resolution deadline has passed")]
    NewsDeadlinePassed,

    /// Only the designated resolution authority can resolve this news item.
    #[msg("Unauthorized: not the resolution authority")]
    UnauthorizedResolver,

    /// Resolution outcome must be YES or NO.
    #[msg("Invalid outcome")]
    InvalidOutcome,

    /// The pool registry could not be read; totals cannot be derived.
    #[msg("Primary ledger unavailable")]
    PrimaryLedgerUnavailable,

    /// Totals were built from fallback data and cannot back a final payout.
    #[msg("Pool totals are provisional")]
    ProvisionalTotals,

    /// Engine configuration is inconsistent.
    #[msg("Invalid engine configuration")]
    InvalidConfig,

    /// Overflow in arithmetic operation.
    #[msg("Arithmetic overflow")]
    Overflow,

    /// Distributed payouts exceed the post-fee remainder (should never happen).
    #[msg("Payouts exceed distributable remainder")]
    Overpayment,

    /// Reconciled totals do not describe the pool being settled.
    #[msg("Totals do not match the pool")]
    TotalsMismatch,
}
