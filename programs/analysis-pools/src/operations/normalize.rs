use crate::state::{NewsOutcome, Position};

/// Translate the pool registry's raw position flag into a canonical label.
///
/// The registry stores the flag inverted: `true` is NO, `false` is YES.
/// This is the only place that inversion is undone.
pub fn normalize_position(raw: bool) -> Position {
    if raw {
        Position::No
    } else {
        Position::Yes
    }
}

/// Re-encode a canonical label for the registry. Inverse of
/// `normalize_position`.
pub fn encode_position(position: Position) -> bool {
    match position {
        Position::Yes => false,
        Position::No => true,
    }
}

/// Registry outcome flags share the position encoding; an unresolved
/// record has no outcome regardless of its flag.
pub fn normalize_outcome(resolved: bool, raw_outcome: bool) -> NewsOutcome {
    if resolved {
        normalize_position(raw_outcome).into()
    } else {
        NewsOutcome::Unresolved
    }
}
