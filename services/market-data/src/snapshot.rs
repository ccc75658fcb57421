//! Book snapshot types
//!
//! Value copies handed to consumers; nothing here borrows from the book.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity, Timestamp};

/// One aggregated price level in a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
    /// Number of resting orders at this level. Not carried by the binary
    /// codec; decoded snapshots report zero.
    pub order_count: u32,
}

/// Best bid/ask and their aggregated sizes at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopOfBook {
    pub symbol: String,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub bid_size: Quantity,
    pub ask_size: Quantity,
    pub timestamp: Timestamp,
}

impl TopOfBook {
    /// Midpoint of the two best prices, when both sides exist.
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some(bid.midpoint(ask)),
            _ => None,
        }
    }

    /// Best ask minus best bid, when both sides exist.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// Top-N price levels per side with aggregate quantity and order count.
///
/// `sequence_number` is the owning book's trade count at snapshot time,
/// which lets consumers order snapshots against the trade stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub symbol: String,
    /// Descending price order, best bid first.
    pub bids: Vec<PriceLevel>,
    /// Ascending price order, best ask first.
    pub asks: Vec<PriceLevel>,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_price_and_spread() {
        let tob = TopOfBook {
            symbol: "TEST".to_string(),
            best_bid: Some(Price::new(10_000)),
            best_ask: Some(Price::new(10_010)),
            bid_size: 100,
            ask_size: 50,
            timestamp: 1,
        };

        assert_eq!(tob.mid_price(), Some(Price::new(10_005)));
        assert_eq!(tob.spread(), Some(Price::new(10)));
    }

    #[test]
    fn test_one_sided_book_has_no_mid() {
        let tob = TopOfBook {
            symbol: "TEST".to_string(),
            best_bid: Some(Price::new(10_000)),
            best_ask: None,
            bid_size: 100,
            ask_size: 0,
            timestamp: 1,
        };

        assert_eq!(tob.mid_price(), None);
        assert_eq!(tob.spread(), None);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let snapshot = DepthSnapshot {
            symbol: "TEST".to_string(),
            bids: vec![PriceLevel { price: Price::new(10_000), quantity: 100, order_count: 2 }],
            asks: vec![PriceLevel { price: Price::new(10_010), quantity: 50, order_count: 1 }],
            timestamp: 42,
            sequence_number: 7,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DepthSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
