//! End-to-end intent scenarios through the engine façade.

use matching_engine::clock::StepClock;
use matching_engine::messages::{CancelRequest, NewOrderRequest, ReplaceRequest};
use matching_engine::MatchingEngine;
use types::config::{StpPolicy, SymbolConfig};
use types::errors::ResultCode;
use types::ids::{OrderId, TraderId};
use types::numeric::Price;
use types::order::{OrderType, Side, TimeInForce};

fn make_engine(stp_policy: StpPolicy) -> MatchingEngine {
    let mut engine = MatchingEngine::with_clock(false, Box::new(StepClock::new()));
    assert!(engine.add_symbol(SymbolConfig::new("TEST").with_stp_policy(stp_policy)));
    engine
}

fn limit_order(
    id: u64,
    trader: u64,
    side: Side,
    price: i64,
    quantity: u64,
    tif: TimeInForce,
) -> NewOrderRequest {
    NewOrderRequest {
        order_id: OrderId::new(id),
        trader_id: TraderId::new(trader),
        symbol: "TEST".to_string(),
        side,
        order_type: OrderType::Limit,
        price: Price::new(price),
        quantity,
        time_in_force: tif,
        timestamp: id,
    }
}

fn active_orders(engine: &MatchingEngine) -> usize {
    engine
        .get_order_book("TEST")
        .map(|book| book.active_order_count())
        .unwrap_or(0)
}

#[test]
fn simple_cross() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 100, Side::Sell, 10_000, 100, TimeInForce::Day));
    let response =
        engine.handle_new_order(limit_order(2, 101, Side::Buy, 10_000, 100, TimeInForce::Day));

    assert_eq!(response.result, ResultCode::Success);
    assert_eq!(response.trades.len(), 1);
    let trade = &response.trades[0];
    assert_eq!(trade.price, Price::new(10_000));
    assert_eq!(trade.quantity, 100);
    assert_eq!(trade.aggressor_side, Side::Buy);
    assert_eq!(trade.aggressive_order_id, OrderId::new(2));
    assert_eq!(trade.passive_order_id, OrderId::new(1));

    let tob = engine.get_top_of_book("TEST", Some(0)).unwrap();
    assert_eq!(tob.best_bid, None);
    assert_eq!(tob.best_ask, None);
    assert_eq!(active_orders(&engine), 0);
}

#[test]
fn partial_fill_rests_on_book() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 100, Side::Sell, 10_000, 100, TimeInForce::Day));
    let response =
        engine.handle_new_order(limit_order(2, 101, Side::Buy, 10_000, 40, TimeInForce::Day));

    assert_eq!(response.trades.len(), 1);
    assert_eq!(response.trades[0].quantity, 40);

    let tob = engine.get_top_of_book("TEST", Some(0)).unwrap();
    assert_eq!(tob.best_ask, Some(Price::new(10_000)));
    assert_eq!(tob.ask_size, 60);
    assert_eq!(active_orders(&engine), 1);
}

#[test]
fn market_order_executes_at_resting_price() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 100, Side::Sell, 10_000, 100, TimeInForce::Day));

    let mut market = limit_order(2, 101, Side::Buy, -1, 50, TimeInForce::Day);
    market.order_type = OrderType::Market;
    market.price = Price::INVALID;
    let response = engine.handle_new_order(market);

    assert_eq!(response.trades.len(), 1);
    assert_eq!(response.trades[0].quantity, 50);
    assert_eq!(response.trades[0].price, Price::new(10_000));

    let tob = engine.get_top_of_book("TEST", Some(0)).unwrap();
    assert_eq!(tob.best_ask, Some(Price::new(10_000)));
    assert_eq!(tob.ask_size, 50);
}

#[test]
fn ioc_residual_is_dropped() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 100, Side::Sell, 10_000, 100, TimeInForce::Day));
    let response =
        engine.handle_new_order(limit_order(2, 101, Side::Buy, 10_000, 150, TimeInForce::Ioc));

    assert_eq!(response.trades.len(), 1);
    assert_eq!(response.trades[0].quantity, 100);

    let tob = engine.get_top_of_book("TEST", Some(0)).unwrap();
    assert_eq!(tob.best_bid, None);
    assert_eq!(active_orders(&engine), 0);
}

#[test]
fn stp_cancel_incoming_suppresses_match() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 42, Side::Sell, 10_000, 100, TimeInForce::Day));
    let response =
        engine.handle_new_order(limit_order(2, 42, Side::Buy, 10_000, 100, TimeInForce::Day));

    assert_eq!(response.result, ResultCode::Success);
    assert!(response.trades.is_empty());

    // The resting sell is unchanged and nothing from order 2 rests.
    let tob = engine.get_top_of_book("TEST", Some(0)).unwrap();
    assert_eq!(tob.best_ask, Some(Price::new(10_000)));
    assert_eq!(tob.ask_size, 100);
    assert_eq!(tob.best_bid, None);
    assert_eq!(active_orders(&engine), 1);
}

#[test]
fn cancel_unknown_order_reports_not_found() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    engine.handle_new_order(limit_order(1, 100, Side::Buy, 10_000, 100, TimeInForce::Day));

    let response = engine.handle_cancel(CancelRequest {
        order_id: OrderId::new(999),
        symbol: "TEST".to_string(),
        timestamp: 2,
    });

    assert_eq!(response.result, ResultCode::RejectedOrderNotFound);
    assert_eq!(response.rejects.len(), 1);
    assert_eq!(response.rejects[0].reason, ResultCode::RejectedOrderNotFound);
    assert!(response.cancels.is_empty());
    assert_eq!(active_orders(&engine), 1);
}

#[test]
fn replace_loses_queue_priority() {
    let mut engine = make_engine(StpPolicy::CancelIncoming);

    // A then B rest at the same price.
    engine.handle_new_order(limit_order(1, 100, Side::Buy, 10_000, 100, TimeInForce::Day));
    engine.handle_new_order(limit_order(2, 102, Side::Buy, 10_000, 50, TimeInForce::Day));

    // Shrink A; it goes to the back of the queue.
    let response = engine.handle_replace(ReplaceRequest {
        order_id: OrderId::new(1),
        symbol: "TEST".to_string(),
        new_price: Price::new(10_000),
        new_quantity: 80,
        timestamp: 3,
    });
    assert_eq!(response.result, ResultCode::Success);
    assert!(response.trades.is_empty());

    let response =
        engine.handle_new_order(limit_order(3, 101, Side::Sell, 10_000, 200, TimeInForce::Day));

    assert_eq!(response.trades.len(), 2);
    assert_eq!(response.trades[0].passive_order_id, OrderId::new(2));
    assert_eq!(response.trades[0].quantity, 50);
    assert_eq!(response.trades[1].passive_order_id, OrderId::new(1));
    assert_eq!(response.trades[1].quantity, 80);
}
