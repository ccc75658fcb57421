//! Crossing detection
//!
//! Determines when an incoming order's price is compatible with a resting
//! level. Market orders carry no limit and cross everything.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask price cross.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order crosses a resting level.
///
/// `limit` is `None` for market orders.
pub fn incoming_crosses(side: Side, limit: Option<Price>, resting_price: Price) -> bool {
    match (side, limit) {
        (_, None) => true,
        (Side::Buy, Some(limit)) => can_match(limit, resting_price),
        (Side::Sell, Some(limit)) => can_match(resting_price, limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        assert!(can_match(Price::new(10_000), Price::new(9_900)));
        assert!(can_match(Price::new(10_000), Price::new(10_000)));
        assert!(!can_match(Price::new(9_900), Price::new(10_000)));
    }

    #[test]
    fn test_incoming_buy() {
        assert!(incoming_crosses(Side::Buy, Some(Price::new(10_000)), Price::new(9_900)));
        assert!(!incoming_crosses(Side::Buy, Some(Price::new(9_800)), Price::new(9_900)));
    }

    #[test]
    fn test_incoming_sell() {
        assert!(incoming_crosses(Side::Sell, Some(Price::new(9_900)), Price::new(10_000)));
        assert!(!incoming_crosses(Side::Sell, Some(Price::new(10_100)), Price::new(10_000)));
    }

    #[test]
    fn test_market_crosses_everything() {
        assert!(incoming_crosses(Side::Buy, None, Price::new(1)));
        assert!(incoming_crosses(Side::Sell, None, Price::new(i64::MAX)));
    }
}
