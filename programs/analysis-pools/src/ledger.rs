//! Records supplied by the external readers, and the reconciled view built
//! from them.

use anchor_lang::prelude::*;

use crate::state::{NewsOutcome, Position};

/// Result of reading one external ledger.
///
/// Unavailability is a value, never a zero-filled record, so the reconciler
/// can tell "no activity" apart from "could not look".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerRead<T> {
    Available(T),
    Unavailable,
}

impl<T> LedgerRead<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, LedgerRead::Available(_))
    }

    pub fn as_ref(&self) -> LedgerRead<&T> {
        match self {
            LedgerRead::Available(value) => LedgerRead::Available(value),
            LedgerRead::Unavailable => LedgerRead::Unavailable,
        }
    }

    pub fn available(self) -> Option<T> {
        match self {
            LedgerRead::Available(value) => Some(value),
            LedgerRead::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for LedgerRead<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(LedgerRead::Unavailable, LedgerRead::Available)
    }
}

impl<T, E: std::fmt::Display> From<std::result::Result<T, E>> for LedgerRead<T> {
    /// Fetch failures degrade to `Unavailable`; the cause is logged here.
    fn from(value: std::result::Result<T, E>) -> Self {
        match value {
            Ok(record) => LedgerRead::Available(record),
            Err(err) => {
                msg!("Ledger read failed: {}", err);
                LedgerRead::Unavailable
            }
        }
    }
}

/// ─── Primary Ledger Record ────────────────────────────────────────
///
/// Per-pool aggregate as recorded by the pool registry. Position and
/// outcome indicators use the registry's raw (inverted) encoding.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrimaryLedgerRecord {
    pub creator: Pubkey,

    pub creator_stake: u64,

    /// Raw registry flag: `true` means NO.
    pub declared_raw_position: bool,

    /// Everything the registry has seen staked on the pool, creator included.
    pub grand_total: u64,

    pub resolved: bool,

    /// Raw news outcome flag, same encoding as `declared_raw_position`.
    /// Ignored unless `resolved`.
    pub raw_outcome: bool,
}

/// ─── Secondary Ledger Report ──────────────────────────────────────
///
/// Backer-only totals from the per-staker ledger. The creator stake is
/// never part of these figures.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SecondaryLedgerReport {
    pub agree_total: u64,
    pub disagree_total: u64,
    pub grand_total: u64,
    pub staker_count: u32,
}

/// ─── Resolution Report ────────────────────────────────────────────
///
/// Final word from the resolution authority on a news item.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResolutionReport {
    pub outcome: NewsOutcome,
    pub resolved_at: i64,
    pub resolved_by: Pubkey,
    pub source: String,
    pub notes: String,
}

/// ─── Reconciled Totals ────────────────────────────────────────────
///
/// Authoritative per-pool figures.
///
/// # Invariant
/// `agree_total + disagree_total == grand_total` and
/// `agree_total >= creator_stake`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconciledTotals {
    pub creator_stake: u64,
    pub creator_position: Position,
    pub agree_total: u64,
    pub disagree_total: u64,
    pub grand_total: u64,
    /// Which branch of the fallback chain produced the figures.
    pub source: TotalsSource,
    pub confidence: Confidence,
}

impl ReconciledTotals {
    pub fn backer_agree_total(&self) -> u64 {
        self.agree_total.saturating_sub(self.creator_stake)
    }

    pub fn is_provisional(&self) -> bool {
        self.confidence == Confidence::Provisional
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TotalsSource {
    /// Backer breakdown taken from the per-staker ledger.
    SecondaryLedger,
    /// Registry total exceeded the creator stake; the excess is assumed
    /// to oppose the creator.
    PrimaryExcess,
    /// No backer activity seen by either ledger.
    CreatorOnly,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Confidence {
    Confirmed,
    /// Built from fallback data; anything derived from it should be shown
    /// as an estimate.
    Provisional,
}
