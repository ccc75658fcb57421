//! Events emitted by the matching engine
//!
//! Every event carries the engine timestamp of the intent that produced it
//! and an engine-wide monotonic sequence number stamped by the façade.

use crate::errors::ResultCode;
use crate::ids::{OrderId, TradeId, TraderId};
use crate::numeric::{Price, Quantity, Timestamp};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Trade generated when orders match.
///
/// The price is always the resting (passive) order's price; the aggressor
/// is the incoming order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub trade_id: TradeId,
    pub symbol: String,
    pub price: Price,
    pub quantity: Quantity,
    pub aggressor_side: Side,
    pub aggressive_order_id: OrderId,
    pub passive_order_id: OrderId,
    pub aggressive_trader_id: TraderId,
    pub passive_trader_id: TraderId,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}

/// Order accepted into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAcceptedEvent {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}

/// Order rejected before touching the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejectedEvent {
    pub order_id: OrderId,
    pub symbol: String,
    pub reason: ResultCode,
    pub message: String,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}

/// Resting order cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order_id: OrderId,
    pub symbol: String,
    pub remaining_quantity: Quantity,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}

/// Resting order replaced with new price/quantity.
///
/// The replacement keeps the same order id but is treated as a fresh
/// arrival, so it loses queue priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReplacedEvent {
    pub old_order_id: OrderId,
    pub new_order_id: OrderId,
    pub symbol: String,
    pub new_price: Price,
    pub new_quantity: Quantity,
    pub timestamp: Timestamp,
    pub sequence_number: u64,
}
