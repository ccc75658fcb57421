//! Engine → listener → SPSC ring → publisher thread, end to end.

use std::sync::{Arc, Mutex};

use market_data::MarketDataPublisher;
use matching_engine::clock::StepClock;
use matching_engine::listener::MarketDataListener;
use matching_engine::messages::NewOrderRequest;
use matching_engine::MatchingEngine;
use types::config::SymbolConfig;
use types::ids::{OrderId, TraderId};
use types::numeric::Price;
use types::order::{OrderType, Side, TimeInForce};

fn order(id: u64, trader: u64, side: Side, price: i64, quantity: u64) -> NewOrderRequest {
    NewOrderRequest {
        order_id: OrderId::new(id),
        trader_id: TraderId::new(trader),
        symbol: "TEST".to_string(),
        side,
        order_type: OrderType::Limit,
        price: Price::new(price),
        quantity,
        time_in_force: TimeInForce::Day,
        timestamp: id,
    }
}

#[test]
fn trades_reach_the_publisher_callback_in_order() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let mut publisher = MarketDataPublisher::new(1024);
    publisher.start(Box::new(move |event| {
        sink.lock()
            .unwrap()
            .push((event.sequence_number, event.quantity));
    }));
    let publisher = Arc::new(publisher);

    let mut engine = MatchingEngine::with_clock(false, Box::new(StepClock::new()));
    engine.add_symbol(SymbolConfig::new("TEST"));
    engine.add_listener(Box::new(MarketDataListener::new(Arc::clone(&publisher))));

    engine.handle_new_order(order(1, 100, Side::Sell, 10_000, 60));
    engine.handle_new_order(order(2, 100, Side::Sell, 10_100, 60));
    engine.handle_new_order(order(3, 101, Side::Buy, 10_100, 100));

    // Drop the engine's listener handle, then stop via the last Arc.
    drop(engine);
    let mut publisher = Arc::try_unwrap(publisher).unwrap_or_else(|_| panic!("publisher still shared"));
    publisher.stop();

    assert_eq!(publisher.events_published(), 2);
    assert_eq!(publisher.events_dropped(), 0);

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    // Match order: 60 at the better price, then 40 at the next level.
    assert_eq!(received[0].1, 60);
    assert_eq!(received[1].1, 40);
    assert!(received[0].0 < received[1].0);
}
