//! Naive reference order book
//!
//! Deliberately simple oracle: every resting order sits in one `Vec`, and
//! matching scans the whole list for the best eligible counterparty (best
//! price, then earliest arrival). Slow but easy to verify by eye; the
//! optimized book must produce byte-identical trades, best bid/ask, and
//! depth for every legal intent sequence.

use std::collections::BTreeMap;

use market_data::snapshot::{DepthSnapshot, PriceLevel, TopOfBook};
use types::config::StpPolicy;
use types::events::TradeEvent;
use types::ids::{OrderId, TradeId};
use types::numeric::{Price, Quantity, Timestamp};
use types::order::{Order, Side};

use crate::book::BookError;
use crate::matching::stp::{self, StpAction};

/// Linear-scan order book with the same surface as `OrderBook`.
pub struct ReferenceOrderBook {
    symbol: String,
    stp_policy: StpPolicy,
    /// All resting orders in arrival order.
    orders: Vec<Order>,
    next_trade_id: TradeId,
    trade_count: u64,
}

impl ReferenceOrderBook {
    pub fn new(symbol: impl Into<String>, stp_policy: StpPolicy) -> Self {
        Self {
            symbol: symbol.into(),
            stp_policy,
            orders: Vec::new(),
            next_trade_id: TradeId::new(1),
            trade_count: 0,
        }
    }

    pub fn add_order(
        &mut self,
        order: Order,
        timestamp: Timestamp,
    ) -> Result<Vec<TradeEvent>, BookError> {
        if order.is_fok() && !self.fok_fillable(&order) {
            return Err(BookError::FokNotFillable);
        }

        let mut order = order;
        let mut trades = Vec::new();
        self.match_order(&mut order, timestamp, &mut trades);

        // The pre-check walks the same orders the match loop does, so a
        // FOK that passed it always fills completely.
        debug_assert!(!order.is_fok() || order.remaining_quantity == 0);

        if order.remaining_quantity > 0 && order.is_limit() && !order.is_ioc() && !order.is_fok() {
            self.orders.push(order);
        }

        Ok(trades)
    }

    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.order_id == order_id)?;
        Some(self.orders.remove(pos))
    }

    pub fn replace_order(
        &mut self,
        order_id: OrderId,
        new_price: Price,
        new_quantity: Quantity,
        timestamp: Timestamp,
    ) -> Result<Vec<TradeEvent>, BookError> {
        let Some(existing) = self.cancel_order(order_id) else {
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

    pub fn get_best_bid(&self) -> Option<Price> {
        self.orders
            .iter()
            .filter(|o| o.is_buy())
            .map(|o| o.price)
            .max()
    }

    pub fn get_best_ask(&self) -> Option<Price> {
        self.orders
            .iter()
            .filter(|o| o.is_sell())
            .map(|o| o.price)
            .min()
    }

    pub fn get_top_of_book(&self, timestamp: Timestamp) -> TopOfBook {
        let best_bid = self.get_best_bid();
        let best_ask = self.get_best_ask();

        let size_at = |side: Side, price: Price| -> Quantity {
            self.orders
                .iter()
                .filter(|o| o.side == side && o.price == price)
                .map(|o| o.remaining_quantity)
                .sum()
        };

        TopOfBook {
            symbol: self.symbol.clone(),
            best_bid,
            best_ask,
            bid_size: best_bid.map_or(0, |p| size_at(Side::Buy, p)),
            ask_size: best_ask.map_or(0, |p| size_at(Side::Sell, p)),
            timestamp,
        }
    }

    pub fn get_depth_snapshot(&self, depth_levels: usize, timestamp: Timestamp) -> DepthSnapshot {
        let mut bid_map: BTreeMap<Price, (Quantity, u32)> = BTreeMap::new();
        let mut ask_map: BTreeMap<Price, (Quantity, u32)> = BTreeMap::new();

        for order in &self.orders {
            let map = match order.side {
                Side::Buy => &mut bid_map,
                Side::Sell => &mut ask_map,
            };
            let entry = map.entry(order.price).or_insert((0, 0));
            entry.0 += order.remaining_quantity;
            entry.1 += 1;
        }

        let to_level = |(price, (quantity, order_count)): (&Price, &(Quantity, u32))| PriceLevel {
            price: *price,
            quantity: *quantity,
            order_count: *order_count,
        };

        DepthSnapshot {
            symbol: self.symbol.clone(),
            bids: bid_map.iter().rev().take(depth_levels).map(to_level).collect(),
            asks: ask_map.iter().take(depth_levels).map(to_level).collect(),
            timestamp,
            sequence_number: self.trade_count,
        }
    }

    pub fn find_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn active_order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    // ── Naive matching ──────────────────────────────────────────────

    fn match_order(&mut self, incoming: &mut Order, timestamp: Timestamp, trades: &mut Vec<TradeEvent>) {
        while incoming.remaining_quantity > 0 {
            let Some(best_idx) = self.find_best_match(incoming) else {
                break;
            };

            let resting = &self.orders[best_idx];
            let (resting_id, resting_trader, resting_price, resting_remaining) = (
                resting.order_id,
                resting.trader_id,
                resting.price,
                resting.remaining_quantity,
            );

            if let Some(action) = stp::check(self.stp_policy, incoming.trader_id, resting_trader) {
                match action {
                    StpAction::CancelIncoming => {
                        incoming.remaining_quantity = 0;
                        break;
                    }
                    StpAction::CancelResting => {
                        self.cancel_order(resting_id);
                        continue;
                    }
                    StpAction::CancelBoth => {
                        self.cancel_order(resting_id);
                        incoming.remaining_quantity = 0;
                        break;
                    }
                }
            }

            let fill = incoming.remaining_quantity.min(resting_remaining);

            let trade_id = self.next_trade_id;
            self.next_trade_id = trade_id.next();
            trades.push(TradeEvent {
                trade_id,
                symbol: self.symbol.clone(),
                price: resting_price,
                quantity: fill,
                aggressor_side: incoming.side,
                aggressive_order_id: incoming.order_id,
                passive_order_id: resting_id,
                aggressive_trader_id: incoming.trader_id,
                passive_trader_id: resting_trader,
                timestamp,
                sequence_number: 0,
            });

            incoming.remaining_quantity -= fill;
            self.orders[best_idx].remaining_quantity -= fill;
            self.trade_count += 1;

            if self.orders[best_idx].remaining_quantity == 0 {
                self.orders.remove(best_idx);
            }
        }
    }

    /// Linear search for the best eligible counterparty: best price first,
    /// then earliest arrival.
    fn find_best_match(&self, incoming: &Order) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (idx, order) in self.orders.iter().enumerate() {
            if order.side == incoming.side || order.remaining_quantity == 0 {
                continue;
            }
            if !Self::can_trade(incoming, order) {
                continue;
            }

            match best {
                None => best = Some(idx),
                Some(best_idx) => {
                    let current = &self.orders[best_idx];
                    let better_price = match incoming.side {
                        Side::Buy => order.price < current.price,
                        Side::Sell => order.price > current.price,
                    };
                    let earlier_at_same_price =
                        order.price == current.price && order.timestamp < current.timestamp;
                    if better_price || earlier_at_same_price {
                        best = Some(idx);
                    }
                }
            }
        }

        best
    }

    fn can_trade(incoming: &Order, resting: &Order) -> bool {
        if incoming.is_market() {
            return true;
        }
        match incoming.side {
            Side::Buy => incoming.price >= resting.price,
            Side::Sell => incoming.price <= resting.price,
        }
    }

    /// Same pre-check as the optimized book: visit the eligible resting
    /// orders in the order the match loop would pick them and apply the
    /// self-trade decision per pair. An order the policy would cancel
    /// contributes nothing; a pair that would cut the incoming order
    /// short makes it unfillable.
    fn fok_fillable(&self, order: &Order) -> bool {
        let mut eligible: Vec<&Order> = self
            .orders
            .iter()
            .filter(|resting| resting.side != order.side && Self::can_trade(order, resting))
            .collect();
        // Price-time order; the stable sort keeps arrival order for ties.
        eligible.sort_by(|a, b| {
            let by_price = match order.side {
                Side::Buy => a.price.cmp(&b.price),
                Side::Sell => b.price.cmp(&a.price),
            };
            by_price.then(a.timestamp.cmp(&b.timestamp))
        });

        let mut remaining = order.remaining_quantity;
        for resting in eligible {
            match stp::check(self.stp_policy, order.trader_id, resting.trader_id) {
                Some(StpAction::CancelResting) => continue,
                Some(StpAction::CancelIncoming) | Some(StpAction::CancelBoth) => return false,
                None => {
                    remaining = remaining.saturating_sub(resting.remaining_quantity);
                    if remaining == 0 {
                        return true;
                    }
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::TraderId;
    use types::order::{OrderType, TimeInForce};

    fn make_order(id: u64, trader: u64, side: Side, price: i64, quantity: Quantity) -> Order {
        Order {
            order_id: OrderId::new(id),
            trader_id: TraderId::new(trader),
            symbol: "TEST".to_string(),
            side,
            order_type: OrderType::Limit,
            price: Price::new(price),
            quantity,
            remaining_quantity: quantity,
            time_in_force: TimeInForce::Day,
            timestamp: id,
            post_only: false,
            hidden: false,
            display_quantity: 0,
        }
    }

    #[test]
    fn test_simple_cross() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelIncoming);
        book.add_order(make_order(1, 100, Side::Sell, 10_000, 100), 1).unwrap();
        let trades = book
            .add_order(make_order(2, 101, Side::Buy, 10_000, 100), 2)
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Price::new(10_000));
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(book.active_order_count(), 0);
    }

    #[test]
    fn test_best_price_then_earliest() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelIncoming);
        book.add_order(make_order(1, 100, Side::Sell, 10_100, 50), 1).unwrap();
        book.add_order(make_order(2, 100, Side::Sell, 10_000, 50), 2).unwrap();
        book.add_order(make_order(3, 100, Side::Sell, 10_000, 50), 3).unwrap();

        let trades = book
            .add_order(make_order(4, 101, Side::Buy, 10_100, 120), 4)
            .unwrap();

        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].passive_order_id, OrderId::new(2));
        assert_eq!(trades[1].passive_order_id, OrderId::new(3));
        assert_eq!(trades[2].passive_order_id, OrderId::new(1));
        assert_eq!(trades[2].quantity, 20);
    }

    #[test]
    fn test_depth_aggregates_orders() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelIncoming);
        book.add_order(make_order(1, 100, Side::Buy, 10_000, 100), 1).unwrap();
        book.add_order(make_order(2, 100, Side::Buy, 10_000, 50), 2).unwrap();
        book.add_order(make_order(3, 100, Side::Buy, 9_900, 25), 3).unwrap();

        let depth = book.get_depth_snapshot(10, 0);
        assert_eq!(depth.bids.len(), 2);
        assert_eq!(depth.bids[0].price, Price::new(10_000));
        assert_eq!(depth.bids[0].quantity, 150);
        assert_eq!(depth.bids[0].order_count, 2);
    }

    #[test]
    fn test_fok_pre_check() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelIncoming);
        book.add_order(make_order(1, 100, Side::Sell, 10_000, 100), 1).unwrap();

        let mut fok = make_order(2, 101, Side::Buy, 10_000, 150);
        fok.time_in_force = TimeInForce::Fok;
        assert_eq!(
            book.add_order(fok, 2).unwrap_err(),
            BookError::FokNotFillable
        );
        assert_eq!(book.active_order_count(), 1);
    }

    #[test]
    fn test_fok_rejected_when_stp_would_cut_it_short() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelIncoming);
        book.add_order(make_order(1, 7, Side::Sell, 10_000, 40), 1).unwrap();
        book.add_order(make_order(2, 9, Side::Sell, 10_000, 200), 2).unwrap();

        // Raw depth covers the order, but matching would stop at the
        // same-trader order with only 40 filled; the execution is void.
        let mut fok = make_order(3, 9, Side::Buy, 10_000, 100);
        fok.time_in_force = TimeInForce::Fok;
        assert_eq!(
            book.add_order(fok, 3).unwrap_err(),
            BookError::FokNotFillable
        );
        assert_eq!(book.active_order_count(), 2);
        assert_eq!(book.get_top_of_book(0).ask_size, 240);
    }

    #[test]
    fn test_fok_fills_past_stp_cancelled_resting() {
        let mut book = ReferenceOrderBook::new("TEST", StpPolicy::CancelResting);
        book.add_order(make_order(1, 7, Side::Sell, 10_000, 40), 1).unwrap();
        book.add_order(make_order(2, 9, Side::Sell, 10_000, 200), 2).unwrap();

        let mut fok = make_order(3, 7, Side::Buy, 10_000, 100);
        fok.time_in_force = TimeInForce::Fok;
        let trades = book.add_order(fok, 3).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(trades[0].passive_order_id, OrderId::new(2));
        assert_eq!(book.active_order_count(), 1);
    }
}
