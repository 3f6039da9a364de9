pub mod classify;
pub mod distribute;
pub mod normalize;
pub mod pool;
pub mod project;
pub mod reconcile;
pub mod reputation;
pub mod resolve;

pub use classify::{derive_pool_outcome, winning_side};
pub use distribute::*;
pub use normalize::*;
pub use pool::*;
pub use project::{project_payout, with_hypothetical_stake, RewardProjection};
pub use reputation::{backer_history, creator_history, HistoryEntry, Weighting};
pub use resolve::*;
