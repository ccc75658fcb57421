//! Multi-symbol matching engine façade
//!
//! Validates intents, routes them to the owning book, stamps engine-wide
//! sequence numbers on every emitted event, and fans events out to
//! listeners, the trade tape, telemetry, and the event log — in that
//! order, synchronously, on the caller's thread.
//!
//! Event order for a single intent: accepted, then trades in match order
//! (replaced first for replace intents), cancelled for cancels, rejected
//! on failure. Exactly one of accepted/rejected is emitted per new-order
//! intent.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use market_data::snapshot::{DepthSnapshot, TopOfBook};
use types::config::SymbolConfig;
use types::errors::ResultCode;
use types::events::{
    OrderAcceptedEvent, OrderCancelledEvent, OrderRejectedEvent, OrderReplacedEvent, TradeEvent,
};
use types::ids::OrderId;
use types::numeric::Timestamp;
use types::order::OrderType;

use crate::book::{BookError, OrderBook};
use crate::clock::{Clock, MonotonicClock, StepClock};
use crate::event_log::EventLog;
use crate::listener::EngineListener;
use crate::messages::{CancelRequest, NewOrderRequest, OrderResponse, ReplaceRequest};
use crate::tape::TradeTape;
use crate::telemetry::{Telemetry, TelemetrySnapshot};

/// Multi-symbol matching engine.
///
/// Single-threaded with respect to a single book: callers serialize all
/// intent handling.
pub struct MatchingEngine {
    symbol_configs: HashMap<String, SymbolConfig>,
    order_books: HashMap<String, OrderBook>,
    trade_tapes: HashMap<String, TradeTape>,
    listeners: Vec<Box<dyn EngineListener>>,
    event_log: EventLog,
    telemetry: Telemetry,
    sequence_number: u64,
    clock: Box<dyn Clock>,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    /// Engine with the monotonic clock and no event logging.
    pub fn new() -> Self {
        Self::with_clock(false, Box::new(MonotonicClock::new()))
    }

    /// Engine with a counting clock and the event log enabled at the
    /// conventional `logs/events.log` path.
    pub fn deterministic() -> Self {
        Self::with_clock(true, Box::new(StepClock::new()))
    }

    pub fn with_clock(deterministic: bool, clock: Box<dyn Clock>) -> Self {
        let mut event_log = EventLog::new();
        event_log.set_deterministic(deterministic);

        Self {
            symbol_configs: HashMap::new(),
            order_books: HashMap::new(),
            trade_tapes: HashMap::new(),
            listeners: Vec::new(),
            event_log,
            telemetry: Telemetry::new(),
            sequence_number: 0,
            clock,
        }
    }

    // ── Symbol management ───────────────────────────────────────────

    /// Register a symbol. Returns false for an invalid config or a symbol
    /// that already exists.
    pub fn add_symbol(&mut self, config: SymbolConfig) -> bool {
        if !config.is_valid() || self.symbol_configs.contains_key(&config.symbol) {
            return false;
        }

        debug!(symbol = %config.symbol, "registering symbol");
        self.order_books.insert(
            config.symbol.clone(),
            OrderBook::new(config.symbol.as_str(), config.stp_policy),
        );
        self.trade_tapes
            .insert(config.symbol.clone(), TradeTape::default());
        self.symbol_configs.insert(config.symbol.clone(), config);
        true
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbol_configs.contains_key(symbol)
    }

    // ── Intent handling ─────────────────────────────────────────────

    pub fn handle_new_order(&mut self, request: NewOrderRequest) -> OrderResponse {
        let started = Instant::now();
        self.telemetry.record_order_processed();
        self.event_log.log_new_order(&request);

        let mut response = OrderResponse::new(request.order_id);
        let timestamp = self.clock.now();

        if let Err(code) = self.validate_new_order(&request) {
            self.reject(&mut response, &request.symbol, request.order_id, code, timestamp);
            self.record_latency(started);
            return response;
        }

        let order = request.to_order();
        let book = self
            .order_books
            .get_mut(&request.symbol)
            .expect("validated symbol has a book");

        match book.add_order(order, timestamp) {
            Err(BookError::FokNotFillable) => {
                self.reject(
                    &mut response,
                    &request.symbol,
                    request.order_id,
                    ResultCode::RejectedFokNotFillable,
                    timestamp,
                );
            }
            Ok(trades) => {
                self.telemetry.record_order_accepted();

                let accept = OrderAcceptedEvent {
                    order_id: request.order_id,
                    symbol: request.symbol.clone(),
                    side: request.side,
                    price: request.price,
                    quantity: request.quantity,
                    timestamp,
                    sequence_number: self.next_sequence(),
                };
                self.event_log.log_accepted(&accept);
                for listener in &mut self.listeners {
                    listener.on_order_accepted(&accept);
                }
                response.accepts.push(accept);

                self.emit_trades(trades, &mut response);
            }
        }

        self.update_symbol_stats(&request.symbol);
        self.record_latency(started);
        response
    }

    pub fn handle_cancel(&mut self, request: CancelRequest) -> OrderResponse {
        let started = Instant::now();
        self.telemetry.record_order_processed();
        self.event_log.log_cancel(&request);

        let mut response = OrderResponse::new(request.order_id);
        let timestamp = self.clock.now();

        if let Err(code) = self.validate_cancel(&request) {
            self.reject(&mut response, &request.symbol, request.order_id, code, timestamp);
            self.record_latency(started);
            return response;
        }

        let book = self
            .order_books
            .get_mut(&request.symbol)
            .expect("validated symbol has a book");

        match book.cancel_order(request.order_id) {
            Some(cancelled) => {
                self.telemetry.record_order_cancelled();

                let event = OrderCancelledEvent {
                    order_id: request.order_id,
                    symbol: request.symbol.clone(),
                    remaining_quantity: cancelled.remaining_quantity,
                    timestamp,
                    sequence_number: self.next_sequence(),
                };
                self.event_log.log_cancelled(&event);
                for listener in &mut self.listeners {
                    listener.on_order_cancelled(&event);
                }
                response.cancels.push(event);
                self.update_symbol_stats(&request.symbol);
            }
            None => {
                self.reject(
                    &mut response,
                    &request.symbol,
                    request.order_id,
                    ResultCode::RejectedOrderNotFound,
                    timestamp,
                );
            }
        }

        self.record_latency(started);
        response
    }

    pub fn handle_replace(&mut self, request: ReplaceRequest) -> OrderResponse {
        let started = Instant::now();
        self.telemetry.record_order_processed();
        self.event_log.log_replace(&request);

        let mut response = OrderResponse::new(request.order_id);
        let timestamp = self.clock.now();

        if let Err(code) = self.validate_replace(&request) {
            self.reject(&mut response, &request.symbol, request.order_id, code, timestamp);
            self.record_latency(started);
            return response;
        }

        let book = self
            .order_books
            .get_mut(&request.symbol)
            .expect("validated symbol has a book");

        match book.replace_order(
            request.order_id,
            request.new_price,
            request.new_quantity,
            timestamp,
        ) {
            Err(BookError::FokNotFillable) => {
                self.reject(
                    &mut response,
                    &request.symbol,
                    request.order_id,
                    ResultCode::RejectedFokNotFillable,
                    timestamp,
                );
            }
            Ok(trades) => {
                let event = OrderReplacedEvent {
                    old_order_id: request.order_id,
                    new_order_id: request.order_id,
                    symbol: request.symbol.clone(),
                    new_price: request.new_price,
                    new_quantity: request.new_quantity,
                    timestamp,
                    sequence_number: self.next_sequence(),
                };
                self.event_log.log_replaced(&event);
                for listener in &mut self.listeners {
                    listener.on_order_replaced(&event);
                }
                response.replaces.push(event);

                self.emit_trades(trades, &mut response);
            }
        }

        self.update_symbol_stats(&request.symbol);
        self.record_latency(started);
        response
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Top of book for a registered symbol; `None` for unknown symbols.
    /// The timestamp defaults to the engine clock.
    pub fn get_top_of_book(&self, symbol: &str, timestamp: Option<Timestamp>) -> Option<TopOfBook> {
        let book = self.order_books.get(symbol)?;
        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        Some(book.get_top_of_book(timestamp))
    }

    /// Depth snapshot for a registered symbol; `None` for unknown symbols.
    pub fn get_depth_snapshot(
        &self,
        symbol: &str,
        depth_levels: usize,
        timestamp: Option<Timestamp>,
    ) -> Option<DepthSnapshot> {
        let book = self.order_books.get(symbol)?;
        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        Some(book.get_depth_snapshot(depth_levels, timestamp))
    }

    /// The most recent trades for a symbol, oldest of them first.
    pub fn get_recent_trades(&self, symbol: &str, max_count: usize) -> Vec<TradeEvent> {
        self.trade_tapes
            .get(symbol)
            .map(|tape| tape.get_recent_trades(max_count))
            .unwrap_or_default()
    }

    pub fn get_order_book(&self, symbol: &str) -> Option<&OrderBook> {
        self.order_books.get(symbol)
    }

    pub fn get_telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    // ── Listeners and event log ─────────────────────────────────────

    pub fn add_listener(&mut self, listener: Box<dyn EngineListener>) {
        self.listeners.push(listener);
    }

    pub fn event_log(&mut self) -> &mut EventLog {
        &mut self.event_log
    }

    pub fn set_deterministic(&mut self, enabled: bool) {
        self.event_log.set_deterministic(enabled);
    }

    pub fn is_deterministic(&self) -> bool {
        self.event_log.is_deterministic()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn validate_new_order(&self, request: &NewOrderRequest) -> Result<(), ResultCode> {
        if !self.has_symbol(&request.symbol) {
            return Err(ResultCode::RejectedInvalidSymbol);
        }
        if request.order_type == OrderType::Limit && !request.price.is_valid() {
            return Err(ResultCode::RejectedInvalidPrice);
        }
        if request.quantity == 0 {
            return Err(ResultCode::RejectedInvalidQuantity);
        }
        Ok(())
    }

    fn validate_cancel(&self, request: &CancelRequest) -> Result<(), ResultCode> {
        if !self.has_symbol(&request.symbol) {
            return Err(ResultCode::RejectedInvalidSymbol);
        }
        Ok(())
    }

    fn validate_replace(&self, request: &ReplaceRequest) -> Result<(), ResultCode> {
        if !self.has_symbol(&request.symbol) {
            return Err(ResultCode::RejectedInvalidSymbol);
        }
        if !request.new_price.is_valid() {
            return Err(ResultCode::RejectedInvalidPrice);
        }
        if request.new_quantity == 0 {
            return Err(ResultCode::RejectedInvalidQuantity);
        }
        Ok(())
    }

    fn reject(
        &mut self,
        response: &mut OrderResponse,
        symbol: &str,
        order_id: OrderId,
        code: ResultCode,
        timestamp: Timestamp,
    ) {
        self.telemetry.record_order_rejected();

        let event = OrderRejectedEvent {
            order_id,
            symbol: symbol.to_string(),
            reason: code,
            message: code.as_str().to_string(),
            timestamp,
            sequence_number: self.next_sequence(),
        };
        self.event_log.log_rejected(&event);
        for listener in &mut self.listeners {
            listener.on_order_rejected(&event);
        }
        response.rejects.push(event);
        response.result = code;
        response.message = code.as_str().to_string();
    }

    /// Stamp, record, publish, and return each trade in match order.
    fn emit_trades(&mut self, trades: Vec<TradeEvent>, response: &mut OrderResponse) {
        for mut trade in trades {
            trade.sequence_number = self.next_sequence();

            self.telemetry.record_trade(&trade.symbol, trade.quantity);
            if let Some(tape) = self.trade_tapes.get_mut(&trade.symbol) {
                tape.add_trade(trade.clone());
            }
            self.event_log.log_trade(&trade);
            for listener in &mut self.listeners {
                listener.on_trade(&trade);
            }
            response.trades.push(trade);
        }
    }

    fn update_symbol_stats(&mut self, symbol: &str) {
        if let Some(book) = self.order_books.get(symbol) {
            self.telemetry.update_symbol_stats(symbol, book.get_stats());
        }
    }

    fn record_latency(&mut self, started: Instant) {
        self.telemetry
            .record_latency(started.elapsed().as_nanos() as u64);
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence_number += 1;
        self.sequence_number
    }
}
