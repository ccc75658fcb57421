//! Per-symbol limit order book
//!
//! Owns every resting order for one symbol and performs matching under
//! strict price-time priority. The half-books hold only order ids; the
//! order index here is the single owner of order state, so a partial fill
//! mutates exactly one place and the level caches are adjusted by the
//! same traded quantity in the same step.
//!
//! After every accepted mutation the book is cross-free, empty levels are
//! deleted, and the index matches the queues exactly.

use std::collections::{HashMap, HashSet};

use market_data::snapshot::{DepthSnapshot, TopOfBook};
use thiserror::Error;
use types::config::StpPolicy;
use types::events::TradeEvent;
use types::ids::{OrderId, TradeId, TraderId};
use types::numeric::{Price, Quantity, Timestamp};
use types::order::{Order, Side};

use crate::matching::crossing;
use crate::matching::stp::{self, StpAction};
use crate::telemetry::SymbolStats;

use super::{AskBook, BidBook, PriceLevelQueue};

/// Failures surfaced by book operations.
///
/// Validation happens in the engine; the book only refuses intents whose
/// semantics forbid touching the book at all.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("fill-or-kill order cannot be fully filled")]
    FokNotFillable,
}

/// Order book for a single symbol.
pub struct OrderBook {
    symbol: String,
    stp_policy: StpPolicy,
    bids: BidBook,
    asks: AskBook,
    /// Sole owner of every resting order.
    orders: HashMap<OrderId, Order>,
    next_trade_id: TradeId,
    trade_count: u64,
    total_volume: u64,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>, stp_policy: StpPolicy) -> Self {
        Self {
            symbol: symbol.into(),
            stp_policy,
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: HashMap::new(),
            next_trade_id: TradeId::new(1),
            trade_count: 0,
            total_volume: 0,
        }
    }

    // ── Order operations ────────────────────────────────────────────

    /// Match an incoming order and rest any residual the time-in-force
    /// allows. Returns the trades in match order.
    ///
    /// A fill-or-kill order that cannot be fully filled is refused before
    /// any mutation.
    pub fn add_order(
        &mut self,
        order: Order,
        timestamp: Timestamp,
    ) -> Result<Vec<TradeEvent>, BookError> {
        if order.is_fok() && !self.fok_fillable(&order) {
            return Err(BookError::FokNotFillable);
        }

        let mut order = order;
        let limit = order.is_limit().then_some(order.price);
        let mut trades = Vec::new();
        self.match_incoming(&mut order, limit, timestamp, &mut trades);

        // The pre-check walks the same orders the match loop does, so a
        // FOK that passed it always fills completely.
        debug_assert!(!order.is_fok() || order.remaining_quantity == 0);

        // Only limit DAY/GTC/GTD residuals rest; IOC and market residuals
        // are dropped, and FOK was either fully filled or refused above.
        if order.remaining_quantity > 0 && order.is_limit() && !order.is_ioc() && !order.is_fok() {
            self.rest(order);
        }

        Ok(trades)
    }

    /// Remove a resting order. Returns the order as it rested, or `None`
    /// for an unknown, filled, or already-cancelled id.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<Order> {
        self.remove_resting(order_id)
    }

    /// Remove the resting order unconditionally, then replay a fresh order
    /// inheriting everything but price, quantity, and timestamp. The
    /// replacement keeps its id and loses queue priority; trades from the
    /// replay are returned. An unknown id is a no-op.
    pub fn replace_order(
        &mut self,
        order_id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
        timestamp: Timestamp,
    ) -> Result<Vec<TradeEvent>, BookError> {
        let Some(existing) = self.remove_resting(order_id) else {
            return Ok(Vec::new());
        };

        let replacement = Order {
            price: new_price,
            quantity: new_quantity,
            remaining_quantity: new_quantity,
            timestamp,
            ..existing
        };

        self.add_order(replacement, timestamp)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn get_best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn get_best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn get_top_of_book(&self, timestamp: Timestamp) -> TopOfBook {
        let (best_bid, bid_size) = match self.bids.best() {
            Some((price, size)) => (Some(price), size),
            None => (None, 0),
        };
        let (best_ask, ask_size) = match self.asks.best() {
            Some((price, size)) => (Some(price), size),
            None => (None, 0),
        };

        TopOfBook {
            symbol: self.symbol.clone(),
            best_bid,
            best_ask,
            bid_size,
            ask_size,
            timestamp,
        }
    }

    pub fn get_depth_snapshot(&self, depth_levels: usize, timestamp: Timestamp) -> DepthSnapshot {
        DepthSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth(depth_levels),
            asks: self.asks.depth(depth_levels),
            timestamp,
            sequence_number: self.trade_count,
        }
    }

    pub fn find_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn active_order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn bid_level_count(&self) -> usize {
        self.bids.level_count()
    }

    pub fn ask_level_count(&self) -> usize {
        self.asks.level_count()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_stats(&self) -> SymbolStats {
        SymbolStats {
            active_orders: self.orders.len() as u64,
            bid_levels: self.bids.level_count() as u64,
            ask_levels: self.asks.level_count() as u64,
            trade_volume: self.total_volume,
            trade_count: self.trade_count,
            // Deepest level of the current book, not a historical maximum.
            max_bid_depth: self.bids.max_level_quantity(),
            max_ask_depth: self.asks.max_level_quantity(),
            best_bid: self.get_best_bid(),
            best_ask: self.get_best_ask(),
        }
    }

    /// Verify the structural invariants; test and validation support.
    ///
    /// Checks that the book is cross-free, that no empty level survives,
    /// that every queued id resolves to an indexed order on the right side
    /// at the right price with positive remaining quantity, and that level
    /// totals equal the sum of their orders' remainders.
    pub fn check_invariants(&self) -> Result<(), String> {
        if let (Some(bid), Some(ask)) = (self.get_best_bid(), self.get_best_ask()) {
            if bid >= ask {
                return Err(format!("book is crossed: best bid {bid} >= best ask {ask}"));
            }
        }

        let mut seen: HashSet<OrderId> = HashSet::new();

        for (side, levels) in [
            (Side::Buy, self.bids.levels().collect::<Vec<_>>()),
            (Side::Sell, self.asks.levels().collect::<Vec<_>>()),
        ] {
            for (price, level) in levels {
                if level.is_empty() {
                    return Err(format!("empty level retained at {price}"));
                }
                let mut total: Quantity = 0;
                for order_id in level.order_ids() {
                    if !seen.insert(order_id) {
                        return Err(format!("order {order_id} queued twice"));
                    }
                    let order = self
                        .orders
                        .get(&order_id)
                        .ok_or_else(|| format!("order {order_id} queued but not indexed"))?;
                    if order.side != side {
                        return Err(format!("order {order_id} queued on wrong side"));
                    }
                    if order.price != price {
                        return Err(format!("order {order_id} queued at wrong price"));
                    }
                    if order.remaining_quantity == 0 {
                        return Err(format!("order {order_id} resting with zero remaining"));
                    }
                    total += order.remaining_quantity;
                }
                if total != level.total_quantity() {
                    return Err(format!(
                        "level {price} total {} != sum of orders {total}",
                        level.total_quantity()
                    ));
                }
            }
        }

        if seen.len() != self.orders.len() {
            return Err(format!(
                "index holds {} orders but queues hold {}",
                self.orders.len(),
                seen.len()
            ));
        }

        Ok(())
    }

    // ── Matching ────────────────────────────────────────────────────

    fn match_incoming(
        &mut self,
        taker: &mut Order,
        limit: Option<Price>,
        timestamp: Timestamp,
        trades: &mut Vec<TradeEvent>,
    ) {
        while taker.remaining_quantity > 0 {
            let best = match taker.side {
                Side::Buy => self.asks.best_front(),
                Side::Sell => self.bids.best_front(),
            };
            let Some((level_price, maker_id)) = best else {
                break;
            };
            if !crossing::incoming_crosses(taker.side, limit, level_price) {
                break;
            }

            let (maker_trader_id, maker_remaining) = {
                let maker = self
                    .orders
                    .get(&maker_id)
                    .expect("queued order missing from index");
                (maker.trader_id, maker.remaining_quantity)
            };

            if let Some(action) = stp::check(self.stp_policy, taker.trader_id, maker_trader_id) {
                match action {
                    StpAction::CancelIncoming => {
                        taker.remaining_quantity = 0;
                        break;
                    }
                    StpAction::CancelResting => {
                        self.remove_resting(maker_id);
                        continue;
                    }
                    StpAction::CancelBoth => {
                        self.remove_resting(maker_id);
                        taker.remaining_quantity = 0;
                        break;
                    }
                }
            }

            let fill = taker.remaining_quantity.min(maker_remaining);
            let trade =
                self.create_trade(taker, maker_id, maker_trader_id, fill, level_price, timestamp);
            trades.push(trade);

            taker.remaining_quantity -= fill;
            match taker.side {
                Side::Buy => self.asks.reduce_at(level_price, fill),
                Side::Sell => self.bids.reduce_at(level_price, fill),
            }

            let maker = self
                .orders
                .get_mut(&maker_id)
                .expect("queued order missing from index");
            maker.remaining_quantity -= fill;
            let maker_done = maker.remaining_quantity == 0;

            self.trade_count += 1;
            self.total_volume += fill;

            if maker_done {
                match taker.side {
                    Side::Buy => self.asks.pop_front_at(level_price),
                    Side::Sell => self.bids.pop_front_at(level_price),
                }
                self.orders.remove(&maker_id);
            }
        }
    }

    /// Fill-or-kill pre-check, done before any mutation. Walks the resting
    /// orders in the exact price-time order the match loop would visit
    /// them and applies the self-trade decision per pair, so it predicts
    /// the match outcome: a resting order the policy would cancel
    /// contributes nothing, and a pair that would cut the incoming order
    /// short makes the order unfillable.
    fn fok_fillable(&self, order: &Order) -> bool {
        match order.side {
            Side::Buy => self.fok_walk(order, self.asks.levels()),
            Side::Sell => self.fok_walk(order, self.bids.levels()),
        }
    }

    fn fok_walk<'a>(
        &self,
        order: &Order,
        levels: impl Iterator<Item = (Price, &'a PriceLevelQueue)>,
    ) -> bool {
        let limit = order.is_limit().then_some(order.price);
        let mut remaining = order.remaining_quantity;

        for (price, level) in levels {
            if !crossing::incoming_crosses(order.side, limit, price) {
                break;
            }
            for resting_id in level.order_ids() {
                let resting = self
                    .orders
                    .get(&resting_id)
                    .expect("queued order missing from index");
                match stp::check(self.stp_policy, order.trader_id, resting.trader_id) {
                    // Would be removed from the book; adds no depth.
                    Some(StpAction::CancelResting) => continue,
                    // Matching would stop here with the incoming cut short.
                    Some(StpAction::CancelIncoming) | Some(StpAction::CancelBoth) => return false,
                    None => {
                        remaining = remaining.saturating_sub(resting.remaining_quantity);
                        if remaining == 0 {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    fn rest(&mut self, order: Order) {
        match order.side {
            Side::Buy => self
                .bids
                .insert(order.order_id, order.price, order.remaining_quantity),
            Side::Sell => self
                .asks
                .insert(order.order_id, order.price, order.remaining_quantity),
        }
        self.orders.insert(order.order_id, order);
    }

    fn remove_resting(&mut self, order_id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&order_id)?;
        let removed = match order.side {
            Side::Buy => self
                .bids
                .remove(order_id, order.price, order.remaining_quantity),
            Side::Sell => self
                .asks
                .remove(order_id, order.price, order.remaining_quantity),
        };
        debug_assert!(removed, "indexed order absent from its level");
        Some(order)
    }

    fn create_trade(
        &mut self,
        taker: &Order,
        maker_id: OrderId,
        maker_trader_id: TraderId,
        quantity: Quantity,
        price: Price,
        timestamp: Timestamp,
    ) -> TradeEvent {
        let trade_id = self.next_trade_id;
        self.next_trade_id = trade_id.next();

        TradeEvent {
            trade_id,
            symbol: self.symbol.clone(),
            price,
            quantity,
            aggressor_side: taker.side,
            aggressive_order_id: taker.order_id,
            passive_order_id: maker_id,
            aggressive_trader_id: taker.trader_id,
            passive_trader_id: maker_trader_id,
            timestamp,
            // Stamped by the engine façade.
            sequence_number: 0,
        }
    }
}
