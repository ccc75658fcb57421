//! Self-trade prevention decision
//!
//! Checked pairwise for each prospective (incoming, resting) match before
//! any trade is created. Anonymous traders (the zero sentinel) are never
//! prevented.

use types::config::StpPolicy;
use types::ids::TraderId;

/// What to do with a prospective self-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StpAction {
    /// Drop the remainder of the incoming order; stop matching.
    CancelIncoming,
    /// Remove the resting order; continue from the new front.
    CancelResting,
    /// Remove the resting order and drop the incoming remainder.
    CancelBoth,
}

/// Decide whether the configured policy fires for this pair.
///
/// Returns `None` when the match may proceed.
pub fn check(policy: StpPolicy, incoming: TraderId, resting: TraderId) -> Option<StpAction> {
    if policy == StpPolicy::None || incoming != resting || !incoming.is_valid() {
        return None;
    }

    match policy {
        StpPolicy::None => None,
        StpPolicy::CancelIncoming => Some(StpAction::CancelIncoming),
        StpPolicy::CancelResting => Some(StpAction::CancelResting),
        StpPolicy::CancelBoth => Some(StpAction::CancelBoth),
    }
}
