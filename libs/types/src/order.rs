//! Order intent and lifecycle types

use crate::ids::{OrderId, TraderId};
use crate::numeric::{Price, Quantity, Timestamp};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Limit,
    Market,
}

/// Time-in-force policy for orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good for the trading day
    Day,
    /// Immediate-or-cancel: match what is possible, drop the rest
    Ioc,
    /// Fill-or-kill: full match or reject entirely
    Fok,
    /// Good-till-cancel
    Gtc,
    /// Good-till-date (reserved, treated as Day)
    Gtd,
}

/// An order owned by the book it rests in.
///
/// `remaining_quantity` is the only mutable field once the order is
/// resting; it only ever decreases, and the order is removed from the
/// book when it reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub time_in_force: TimeInForce,
    pub timestamp: Timestamp,

    // Reserved flags — carried on the wire but not acted on.
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub display_quantity: Quantity,
}

impl Order {
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    pub fn is_limit(&self) -> bool {
        self.order_type == OrderType::Limit
    }

    pub fn is_market(&self) -> bool {
        self.order_type == OrderType::Market
    }

    pub fn is_ioc(&self) -> bool {
        self.time_in_force == TimeInForce::Ioc
    }

    pub fn is_fok(&self) -> bool {
        self.time_in_force == TimeInForce::Fok
    }

    pub fn is_fully_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Quantity executed so far.
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }
}
