//! Engine event listeners
//!
//! Listeners are invoked synchronously on the intent-handling thread, in
//! the order events are emitted: accepted, then trades in match order,
//! then replaced or cancelled, with rejected on failure paths. A listener
//! must not call back into the engine.
//!
//! All methods default to no-ops so implementors pick only the events
//! they care about.

use std::sync::Arc;

use market_data::MarketDataPublisher;
use types::events::{
    OrderAcceptedEvent, OrderCancelledEvent, OrderRejectedEvent, OrderReplacedEvent, TradeEvent,
};

/// Consumer of engine lifecycle and trade events.
pub trait EngineListener {
    fn on_order_accepted(&mut self, _event: &OrderAcceptedEvent) {}
    fn on_order_rejected(&mut self, _event: &OrderRejectedEvent) {}
    fn on_order_cancelled(&mut self, _event: &OrderCancelledEvent) {}
    fn on_order_replaced(&mut self, _event: &OrderReplacedEvent) {}
    fn on_trade(&mut self, _event: &TradeEvent) {}
}

/// Forwards every trade into the lock-free publication ring.
///
/// The engine thread stays the ring's sole producer; overflow shows up in
/// the publisher's dropped counter, never as backpressure here.
pub struct MarketDataListener {
    publisher: Arc<MarketDataPublisher>,
}

impl MarketDataListener {
    pub fn new(publisher: Arc<MarketDataPublisher>) -> Self {
        Self { publisher }
    }
}

impl EngineListener for MarketDataListener {
    fn on_trade(&mut self, event: &TradeEvent) {
        self.publisher.publish_trade(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingListener {
        trades: usize,
    }

    impl EngineListener for CountingListener {
        fn on_trade(&mut self, _event: &TradeEvent) {
            self.trades += 1;
        }
    }

    #[test]
    fn test_defaults_are_noops() {
        use types::errors::ResultCode;
        use types::ids::OrderId;

        let mut listener = CountingListener::default();
        listener.on_order_rejected(&OrderRejectedEvent {
            order_id: OrderId::new(1),
            symbol: "TEST".to_string(),
            reason: ResultCode::RejectedUnknownError,
            message: String::new(),
            timestamp: 0,
            sequence_number: 0,
        });
        assert_eq!(listener.trades, 0);
    }
}
