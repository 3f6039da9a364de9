use crate::state::{NewsOutcome, PoolOutcome, Position, StakePosition, StakeResult};

/// Classify a stake against its pool's outcome.
///
/// Only the outcome and the side matter; amount and timing never do.
pub fn handler(outcome: PoolOutcome, position: StakePosition) -> StakeResult {
    match (outcome, position) {
        (PoolOutcome::Unresolved, _) => StakeResult::Pending,
        (PoolOutcome::CreatorCorrect, StakePosition::Agree) => StakeResult::Won,
        (PoolOutcome::CreatorCorrect, StakePosition::Disagree) => StakeResult::Lost,
        (PoolOutcome::CreatorWrong, StakePosition::Agree) => StakeResult::Lost,
        (PoolOutcome::CreatorWrong, StakePosition::Disagree) => StakeResult::Won,
    }
}

/// Pool outcome implied by a news outcome for a creator holding `position`.
pub fn derive_pool_outcome(position: Position, news: NewsOutcome) -> PoolOutcome {
    match (position, news) {
        (_, NewsOutcome::Unresolved) => PoolOutcome::Unresolved,
        (Position::Yes, NewsOutcome::Yes) | (Position::No, NewsOutcome::No) => {
            PoolOutcome::CreatorCorrect
        }
        (Position::Yes, NewsOutcome::No) | (Position::No, NewsOutcome::Yes) => {
            PoolOutcome::CreatorWrong
        }
    }
}

/// The side that wins under `outcome`, if resolved.
pub fn winning_side(outcome: PoolOutcome) -> Option<StakePosition> {
    match outcome {
        PoolOutcome::CreatorCorrect => Some(StakePosition::Agree),
        PoolOutcome::CreatorWrong => Some(StakePosition::Disagree),
        PoolOutcome::Unresolved => None,
    }
}
