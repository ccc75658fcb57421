//! Intent requests and the engine's response
//!
//! Requests arrive from an external session layer; the engine validates
//! and routes them. The response aggregates every event the intent
//! produced, already sequence-stamped.

use serde::{Deserialize, Serialize};
use types::errors::ResultCode;
use types::events::{
    OrderAcceptedEvent, OrderCancelledEvent, OrderRejectedEvent, OrderReplacedEvent, TradeEvent,
};
use types::ids::{OrderId, TraderId};
use types::numeric::{Price, Quantity, Timestamp};
use types::order::{Order, OrderType, Side, TimeInForce};

/// Submit a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Quantity,
    pub time_in_force: TimeInForce,
    pub timestamp: Timestamp,
}

impl NewOrderRequest {
    /// Build the order the book will own.
    pub fn to_order(&self) -> Order {
        Order {
            order_id: self.order_id,
            trader_id: self.trader_id,
            symbol: self.symbol.clone(),
            side: self.side,
            order_type: self.order_type,
            price: self.price,
            quantity: self.quantity,
            remaining_quantity: self.quantity,
            time_in_force: self.time_in_force,
            timestamp: self.timestamp,
            post_only: false,
            hidden: false,
            display_quantity: 0,
        }
    }
}

/// Cancel a resting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub order_id: OrderId,
    pub symbol: String,
    pub timestamp: Timestamp,
}

/// Replace a resting order's price and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRequest {
    pub order_id: OrderId,
    pub symbol: String,
    pub new_price: Price,
    pub new_quantity: Quantity,
    pub timestamp: Timestamp,
}

/// Everything one intent produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub result: ResultCode,
    pub message: String,
    pub accepts: Vec<OrderAcceptedEvent>,
    pub rejects: Vec<OrderRejectedEvent>,
    pub cancels: Vec<OrderCancelledEvent>,
    pub replaces: Vec<OrderReplacedEvent>,
    pub trades: Vec<TradeEvent>,
}

impl OrderResponse {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            result: ResultCode::Success,
            message: String::new(),
            accepts: Vec::new(),
            rejects: Vec::new(),
            cancels: Vec::new(),
            replaces: Vec::new(),
            trades: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}
